use crate::types::{EventId, GateId};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GateKind {
    /// Leaf of the fault tree; its value is the state of the event.
    Basic(EventId),
    And,
    Or,
    Not,
    Xor,
    /// Voting gate: fails when at least `threshold` inputs fail.
    Vot {
        threshold: usize,
    },
}

impl GateKind {
    /// Short upper-case name of the gate type, as used in Galileo files and labels.
    pub fn type_name(self) -> &'static str {
        match self {
            GateKind::Basic(_) => "BASIC",
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Not => "NOT",
            GateKind::Xor => "XOR",
            GateKind::Vot { .. } => "VOT",
        }
    }

    /// Combines input values according to the gate type.
    ///
    /// # Panics
    ///
    /// Panics for [`GateKind::Basic`], which has no inputs to combine.
    pub fn combine(self, values: impl IntoIterator<Item = bool>) -> bool {
        let mut values = values.into_iter();
        match self {
            GateKind::Basic(e) => panic!("basic event {} has no inputs to combine", e),
            GateKind::And => values.all(|x| x),
            GateKind::Or => values.any(|x| x),
            GateKind::Not => !values.next().expect("NOT gate must have one input"),
            GateKind::Xor => values.filter(|&x| x).take(2).count() == 1,
            GateKind::Vot { threshold } => values.filter(|&x| x).take(threshold).count() == threshold,
        }
    }

    /// Whether the gate is monotone in its inputs.
    pub fn is_coherent(self) -> bool {
        !matches!(self, GateKind::Not | GateKind::Xor)
    }
}

/// A basic event: the state used for evaluation and its failure probability.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BasicEvent {
    pub gate: GateId,
    pub state: bool,
    pub probability: f64,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Gate {
    name: String,
    kind: GateKind,
    inputs: Box<[GateId]>,
}

// Constructors
impl Gate {
    pub(crate) fn new(name: impl Into<String>, kind: GateKind, inputs: &[GateId]) -> Gate {
        Gate {
            name: name.into(),
            kind,
            inputs: inputs.into(),
        }
    }
}

// Getters
impl Gate {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn inputs(&self) -> &[GateId] {
        &self.inputs
    }

    pub fn is_basic(&self) -> bool {
        matches!(self.kind, GateKind::Basic(_))
    }

    pub fn event(&self) -> Option<EventId> {
        match self.kind {
            GateKind::Basic(e) => Some(e),
            _ => None,
        }
    }

    /// Display label: the name, plus `(k/n)` for voting gates.
    pub fn label(&self) -> String {
        match self.kind {
            GateKind::Vot { threshold } => format!("{} ({}/{})", self.name, threshold, self.inputs.len()),
            _ => self.name.clone(),
        }
    }
}
