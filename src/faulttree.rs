//! Fault trees: basic events combined by logic gates into a top event.
//!
//! A [`FaultTree`] is an arena of [`Gate`]s. Every gate only refers to gates
//! created before it, so the arena order is a topological order and the tree
//! can never contain a cycle. Basic events may be shared by several gates,
//! which makes the structure a rooted DAG rather than a strict tree.
//!
//! # Examples
//!
//! ```
//! use ftbdd::faulttree::FaultTreeBuilder;
//!
//! let mut builder = FaultTreeBuilder::new();
//! let pump = builder.basic_event("pump").unwrap();
//! let valve = builder.basic_event("valve").unwrap();
//! let top = builder.or("SYSTEM", [pump, valve]).unwrap();
//! let mut tree = builder.build("cooling", top).unwrap();
//!
//! assert!(!tree.apply());
//! tree.set_state("valve", true);
//! assert!(tree.apply());
//! ```

pub mod galileo;
pub mod gate;

use std::collections::HashMap;

use log::debug;

pub use self::gate::{BasicEvent, Gate, GateKind};
use crate::error::{Error, Result};
use crate::types::{EventId, GateId};

#[derive(Debug, Clone)]
pub struct FaultTree {
    name: String,
    gates: Vec<Gate>,
    events: Vec<BasicEvent>,
    names: HashMap<String, GateId>,
    top: GateId,
}

impl FaultTree {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The top event (the "system") of the tree.
    pub fn top(&self) -> GateId {
        self.top
    }

    pub fn gate(&self, id: GateId) -> &Gate {
        &self.gates[id.index()]
    }

    /// All gates, in topological order (inputs before the gates that use them).
    pub fn gates(&self) -> impl Iterator<Item = (GateId, &Gate)> {
        self.gates.iter().enumerate().map(|(i, g)| (GateId::new(i as u32), g))
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn num_events(&self) -> usize {
        self.events.len()
    }

    pub fn basic_event(&self, id: EventId) -> &BasicEvent {
        &self.events[id.index()]
    }

    /// All basic events, in insertion order.
    pub fn events(&self) -> impl Iterator<Item = (EventId, &BasicEvent)> {
        self.events.iter().enumerate().map(|(i, e)| (EventId::new(i as u32), e))
    }

    pub fn event_name(&self, id: EventId) -> &str {
        self.gate(self.basic_event(id).gate).name()
    }

    /// Looks up a gate by name.
    pub fn find(&self, name: &str) -> Option<GateId> {
        self.names.get(name).copied()
    }

    /// Looks up a basic event by name.
    pub fn event(&self, name: &str) -> Option<EventId> {
        self.find(name).and_then(|g| self.gate(g).event())
    }

    /// Sets the state of the named basic event. Unknown names are ignored.
    pub fn set_state(&mut self, name: &str, state: bool) {
        match self.event(name) {
            Some(e) => self.events[e.index()].state = state,
            None => debug!("set_state: no basic event named {:?}", name),
        }
    }

    pub fn set_states<'a>(&mut self, states: impl IntoIterator<Item = (&'a str, bool)>) {
        for (name, state) in states {
            self.set_state(name, state);
        }
    }

    /// Sets the failure probability of the named basic event. Unknown names are ignored.
    pub fn set_probability(&mut self, name: &str, probability: f64) -> Result<()> {
        check_probability(probability)?;
        match self.event(name) {
            Some(e) => self.events[e.index()].probability = probability,
            None => debug!("set_probability: no basic event named {:?}", name),
        }
        Ok(())
    }

    pub fn set_probabilities<'a>(&mut self, probabilities: impl IntoIterator<Item = (&'a str, f64)>) -> Result<()> {
        for (name, p) in probabilities {
            self.set_probability(name, p)?;
        }
        Ok(())
    }

    /// Current states of all basic events, indexed by [`EventId`].
    pub fn states(&self) -> Vec<bool> {
        self.events.iter().map(|e| e.state).collect()
    }

    /// The state where every basic event is off.
    pub fn false_state(&self) -> Vec<bool> {
        vec![false; self.events.len()]
    }

    /// Evaluates every gate under the given event states.
    ///
    /// The result is indexed by [`GateId`].
    pub fn values(&self, states: &[bool]) -> Vec<bool> {
        assert_eq!(states.len(), self.events.len(), "one state per basic event expected");
        let mut values = Vec::with_capacity(self.gates.len());
        for gate in self.gates.iter() {
            let value = match gate.kind() {
                GateKind::Basic(e) => states[e.index()],
                kind => kind.combine(gate.inputs().iter().map(|i| values[i.index()])),
            };
            values.push(value);
        }
        values
    }

    /// Evaluates the top event under the given event states.
    pub fn evaluate(&self, states: &[bool]) -> bool {
        self.values(states)[self.top.index()]
    }

    /// Evaluates the top event under the current event states.
    pub fn apply(&self) -> bool {
        self.evaluate(&self.states())
    }

    /// Length of the longest path from the top event to a basic event.
    pub fn max_depth(&self) -> usize {
        let mut height = vec![0usize; self.gates.len()];
        for (i, gate) in self.gates.iter().enumerate() {
            let h = gate.inputs().iter().map(|g| height[g.index()] + 1).max().unwrap_or(0);
            height[i] = h;
        }
        height[self.top.index()]
    }

    /// Whether the tree is monotone: no NOT or XOR gate is reachable from the top.
    pub fn is_coherent(&self) -> bool {
        self.reachable().into_iter().all(|g| self.gate(g).kind().is_coherent())
    }

    /// Gates reachable from the top event, in depth-first pre-order.
    pub fn reachable(&self) -> Vec<GateId> {
        let mut visited = vec![false; self.gates.len()];
        let mut order = Vec::new();
        let mut stack = vec![self.top];
        while let Some(id) = stack.pop() {
            if visited[id.index()] {
                continue;
            }
            visited[id.index()] = true;
            order.push(id);
            // Push in reverse so the first input is visited first.
            for &child in self.gate(id).inputs().iter().rev() {
                if !visited[child.index()] {
                    stack.push(child);
                }
            }
        }
        order
    }
}

/// Incrementally builds a [`FaultTree`].
///
/// Gates can only use inputs that were already added, which keeps the tree acyclic.
#[derive(Debug, Default)]
pub struct FaultTreeBuilder {
    gates: Vec<Gate>,
    events: Vec<BasicEvent>,
    names: HashMap<String, GateId>,
}

impl FaultTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a basic event that is off and never fails.
    pub fn basic_event(&mut self, name: &str) -> Result<GateId> {
        self.basic_event_with(name, false, 0.0)
    }

    pub fn basic_event_with(&mut self, name: &str, state: bool, probability: f64) -> Result<GateId> {
        check_probability(probability)?;
        let event = EventId::new(self.events.len() as u32);
        let id = self.push(name, GateKind::Basic(event), &[])?;
        self.events.push(BasicEvent {
            gate: id,
            state,
            probability,
        });
        Ok(id)
    }

    pub fn and(&mut self, name: &str, inputs: impl IntoIterator<Item = GateId>) -> Result<GateId> {
        self.gate(name, GateKind::And, inputs)
    }

    pub fn or(&mut self, name: &str, inputs: impl IntoIterator<Item = GateId>) -> Result<GateId> {
        self.gate(name, GateKind::Or, inputs)
    }

    pub fn xor(&mut self, name: &str, inputs: impl IntoIterator<Item = GateId>) -> Result<GateId> {
        self.gate(name, GateKind::Xor, inputs)
    }

    pub fn not(&mut self, name: &str, input: GateId) -> Result<GateId> {
        self.gate(name, GateKind::Not, [input])
    }

    pub fn vot(&mut self, name: &str, threshold: usize, inputs: impl IntoIterator<Item = GateId>) -> Result<GateId> {
        self.gate(name, GateKind::Vot { threshold }, inputs)
    }

    /// Adds a non-basic gate of the given kind.
    pub fn gate(&mut self, name: &str, kind: GateKind, inputs: impl IntoIterator<Item = GateId>) -> Result<GateId> {
        let inputs: Vec<GateId> = inputs.into_iter().collect();
        match kind {
            GateKind::Basic(_) => {
                return Err(Error::InvalidTree(format!("use basic_event to add `{}`", name)));
            }
            GateKind::Not if inputs.len() != 1 => {
                return Err(Error::InvalidTree(format!(
                    "NOT gate `{}` needs exactly one input, got {}",
                    name,
                    inputs.len()
                )));
            }
            GateKind::Vot { threshold } if threshold == 0 || threshold > inputs.len() => {
                return Err(Error::InvalidTree(format!(
                    "voting gate `{}` has threshold {} for {} inputs",
                    name,
                    threshold,
                    inputs.len()
                )));
            }
            _ if inputs.is_empty() => {
                return Err(Error::InvalidTree(format!("gate `{}` has no inputs", name)));
            }
            _ => {}
        }
        if let Some(bad) = inputs.iter().find(|i| i.index() >= self.gates.len()) {
            return Err(Error::InvalidTree(format!("gate `{}` uses undefined input {}", name, bad)));
        }
        self.push(name, kind, &inputs)
    }

    fn push(&mut self, name: &str, kind: GateKind, inputs: &[GateId]) -> Result<GateId> {
        if self.names.contains_key(name) {
            return Err(Error::InvalidTree(format!("duplicate gate name `{}`", name)));
        }
        let id = GateId::new(self.gates.len() as u32);
        debug!("add {} {} {:?} inputs={:?}", id, kind.type_name(), name, inputs);
        self.gates.push(Gate::new(name, kind, inputs));
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Finishes the tree with `top` as its system gate.
    pub fn build(self, name: &str, top: GateId) -> Result<FaultTree> {
        if top.index() >= self.gates.len() {
            return Err(Error::InvalidTree(format!("top gate {} does not exist", top)));
        }
        Ok(FaultTree {
            name: name.to_string(),
            gates: self.gates,
            events: self.events,
            names: self.names,
            top,
        })
    }
}

fn check_probability(p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(Error::InvalidProbability(p.to_string()))
    }
}

/// Parses a probability given either as a decimal (`0.25`, `1e-3`) or as a fraction (`1/7`).
pub fn parse_probability(s: &str) -> Result<f64> {
    let invalid = || Error::InvalidProbability(s.to_string());
    let s = s.trim();
    let p = match s.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().map_err(|_| invalid())?;
            let den: f64 = den.trim().parse().map_err(|_| invalid())?;
            if den == 0.0 {
                return Err(invalid());
            }
            num / den
        }
        None => s.parse().map_err(|_| invalid())?,
    };
    check_probability(p).map_err(|_| invalid())?;
    Ok(p)
}
