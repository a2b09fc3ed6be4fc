//! Variable ordering heuristics for building a BDD from a fault tree.
//!
//! The size of a BDD depends heavily on the order in which the basic events
//! are tested. Every heuristic implements [`VariableOrdering`] and returns the
//! events to test from the root downwards.

use std::collections::HashSet;

use log::debug;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{Error, Result};
use crate::faulttree::FaultTree;
use crate::types::{EventId, GateId};

pub trait VariableOrdering {
    /// Human-readable name of the heuristic.
    fn name(&self) -> &str;

    /// Orders the basic events of `tree`.
    ///
    /// The result contains distinct events. Events left out are held off
    /// while the BDD is constructed.
    fn order(&self, tree: &FaultTree) -> Result<Vec<EventId>>;
}

/// The order in which the basic events were added to the tree.
#[derive(Debug, Default, Clone)]
pub struct DefaultOrdering;

impl VariableOrdering for DefaultOrdering {
    fn name(&self) -> &str {
        "Default"
    }

    fn order(&self, tree: &FaultTree) -> Result<Vec<EventId>> {
        Ok(tree.events().map(|(e, _)| e).collect())
    }
}

/// An order given explicitly by event names.
#[derive(Debug, Clone)]
pub struct ManualOrdering {
    names: Vec<String>,
}

impl ManualOrdering {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl VariableOrdering for ManualOrdering {
    fn name(&self) -> &str {
        "Manual"
    }

    fn order(&self, tree: &FaultTree) -> Result<Vec<EventId>> {
        let mut seen = HashSet::new();
        let mut order = Vec::with_capacity(self.names.len());
        for name in self.names.iter() {
            let e = tree.event(name).ok_or_else(|| Error::UnknownEvent(name.clone()))?;
            if !seen.insert(e) {
                return Err(Error::InvalidOrdering(format!("event `{}` appears twice", name)));
            }
            order.push(e);
        }
        Ok(order)
    }
}

/// A random permutation of all basic events.
#[derive(Debug, Default, Clone)]
pub struct RandomOrdering {
    /// Fixed seed for reproducible orders; `None` draws a fresh one.
    pub seed: Option<u64>,
}

impl RandomOrdering {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

impl VariableOrdering for RandomOrdering {
    fn name(&self) -> &str {
        "Random"
    }

    fn order(&self, tree: &FaultTree) -> Result<Vec<EventId>> {
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut order: Vec<EventId> = tree.events().map(|(e, _)| e).collect();
        order.shuffle(&mut rng);
        Ok(order)
    }
}

/// Orders events by how deep they lie below the top event.
///
/// The depth of an event is the length of the shortest path to it. Events at
/// the same depth keep the order in which a depth-first walk first meets them.
/// Only events reachable from the top are included.
#[derive(Debug, Clone)]
pub struct BfsOrdering {
    /// Test the deepest events first (the default).
    pub bottom_to_top: bool,
}

impl Default for BfsOrdering {
    fn default() -> Self {
        Self { bottom_to_top: true }
    }
}

impl BfsOrdering {
    pub fn top_to_bottom() -> Self {
        Self { bottom_to_top: false }
    }

    fn depths(tree: &FaultTree, gate: GateId, depth: usize, depths: &mut Vec<(EventId, usize)>) {
        let g = tree.gate(gate);
        match g.event() {
            Some(e) => match depths.iter_mut().find(|(x, _)| *x == e) {
                Some((_, d)) => *d = (*d).min(depth),
                None => depths.push((e, depth)),
            },
            None => {
                for &child in g.inputs() {
                    Self::depths(tree, child, depth + 1, depths);
                }
            }
        }
    }
}

impl VariableOrdering for BfsOrdering {
    fn name(&self) -> &str {
        if self.bottom_to_top {
            "BFS (bottom to top)"
        } else {
            "BFS (top to bottom)"
        }
    }

    fn order(&self, tree: &FaultTree) -> Result<Vec<EventId>> {
        let mut depths = Vec::new();
        Self::depths(tree, tree.top(), 0, &mut depths);
        depths.sort_by_key(|&(_, d)| d);
        debug!("event depths: {:?}", depths);
        let mut order: Vec<EventId> = depths.into_iter().map(|(e, _)| e).collect();
        if self.bottom_to_top {
            order.reverse();
        }
        Ok(order)
    }
}

/// Orders events by how many gates they trip on their own.
///
/// Each event is switched on alone. Every non-basic gate that then evaluates
/// true contributes `max_depth - depth` to the score of the event, counted
/// once per path from the top. Events with the highest score come first.
#[derive(Debug, Default, Clone)]
pub struct SubTreeComplexity;

impl SubTreeComplexity {
    fn score(tree: &FaultTree, values: &[bool], gate: GateId, weight: isize) -> isize {
        let g = tree.gate(gate);
        let own = if !g.is_basic() && values[gate.index()] {
            weight
        } else {
            0
        };
        own + g
            .inputs()
            .iter()
            .map(|&child| Self::score(tree, values, child, weight - 1))
            .sum::<isize>()
    }
}

impl VariableOrdering for SubTreeComplexity {
    fn name(&self) -> &str {
        "Sub-Tree Complexity"
    }

    fn order(&self, tree: &FaultTree) -> Result<Vec<EventId>> {
        let max_depth = tree.max_depth() as isize;
        let mut scored: Vec<(EventId, isize)> = Vec::with_capacity(tree.num_events());
        for (e, _) in tree.events() {
            let mut states = tree.false_state();
            states[e.index()] = true;
            let values = tree.values(&states);
            scored.push((e, Self::score(tree, &values, tree.top(), max_depth)));
        }
        debug!("sub-tree complexity scores: {:?}", scored);
        scored.sort_by_key(|&(_, score)| std::cmp::Reverse(score));
        Ok(scored.into_iter().map(|(e, _)| e).collect())
    }
}

/// Checks that `order` lists distinct events of `tree`.
pub fn validate(tree: &FaultTree, order: &[EventId]) -> Result<()> {
    let mut seen = vec![false; tree.num_events()];
    for &e in order {
        if e.index() >= seen.len() {
            return Err(Error::InvalidOrdering(format!("{} is not an event of the tree", e)));
        }
        if std::mem::replace(&mut seen[e.index()], true) {
            return Err(Error::InvalidOrdering(format!(
                "event `{}` appears twice",
                tree.event_name(e)
            )));
        }
    }
    Ok(())
}
