use std::collections::HashMap;

use num_bigint::BigUint;

use crate::bdd::{Bdd, Node};
use crate::types::{EventId, NodeId};

impl Bdd {
    /// Probability that the top event occurs, given the event probabilities.
    pub fn probability(&self) -> f64 {
        let mut cache = HashMap::new();
        self._probability(self.root, &mut cache)
    }

    fn _probability(&self, node: NodeId, cache: &mut HashMap<NodeId, f64>) -> f64 {
        let (var, low, high) = match self.node(node) {
            Node::Leaf(value) => return if value { 1.0 } else { 0.0 },
            Node::Decision { var, low, high } => (var, low, high),
        };
        if let Some(&p) = cache.get(&node) {
            return p;
        }

        let p_event = self.variable(var).probability;
        let p_low = self._probability(low, cache);
        let p_high = self._probability(high, cache);
        let p = p_high * p_event + p_low * (1.0 - p_event);

        cache.insert(node, p);
        p
    }

    /// Returns one assignment on which the top event occurs, if any exists.
    ///
    /// Only the events tested on the chosen path are listed.
    pub fn one_sat(&self) -> Option<Vec<(EventId, bool)>> {
        if self.root == NodeId::FALSE {
            return None;
        }

        let mut path = Vec::new();
        let mut current = self.root;

        // Walk down, always picking a branch that still reaches `true`.
        // Every decision node of a minimised BDD can reach both leaves; for
        // the raw decision tree, check the branch explicitly.
        while let Node::Decision { var, low, high } = self.node(current) {
            if self.reaches_true(high) {
                path.push((var, true));
                current = high;
            } else {
                path.push((var, false));
                current = low;
            }
        }

        if current == NodeId::TRUE {
            Some(path)
        } else {
            None
        }
    }

    fn reaches_true(&self, node: NodeId) -> bool {
        self.descendants(node).contains(&NodeId::TRUE)
    }

    /// Counts the assignments of `num_vars` variables on which the top event occurs.
    pub fn sat_count(&self, num_vars: usize) -> BigUint {
        let mut cache = HashMap::new();
        let max = BigUint::from(2u32).pow(num_vars as u32);
        self._sat_count(self.root, &max, &mut cache)
    }

    fn _sat_count(&self, node: NodeId, max: &BigUint, cache: &mut HashMap<NodeId, BigUint>) -> BigUint {
        let (low, high) = match self.node(node) {
            Node::Leaf(false) => return BigUint::ZERO,
            Node::Leaf(true) => return max.clone(),
            Node::Decision { low, high, .. } => (low, high),
        };

        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let count_low = self._sat_count(low, max, cache);
        let count_high = self._sat_count(high, max, cache);
        let count: BigUint = (count_low + count_high) >> 1;

        cache.insert(node, count.clone());
        count
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::bdd::construct::BddConstructor;
    use crate::faulttree::tests::example_tree;
    use crate::faulttree::FaultTreeBuilder;
    use crate::ordering::DefaultOrdering;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_probability_and() {
        let mut b = FaultTreeBuilder::new();
        let x = b.basic_event_with("x", false, 0.5).unwrap();
        let y = b.basic_event_with("y", false, 0.2).unwrap();
        let top = b.and("top", [x, y]).unwrap();
        let tree = b.build("t", top).unwrap();

        let bdd = BddConstructor::new(&tree).construct(&DefaultOrdering, true).unwrap();
        assert!(close(bdd.probability(), 0.1));
    }

    #[test]
    fn test_probability_or() {
        let mut b = FaultTreeBuilder::new();
        let x = b.basic_event_with("x", false, 0.5).unwrap();
        let y = b.basic_event_with("y", false, 0.2).unwrap();
        let top = b.or("top", [x, y]).unwrap();
        let tree = b.build("t", top).unwrap();

        // Same result with or without minimisation.
        let constructor = BddConstructor::new(&tree);
        let raw = constructor.construct(&DefaultOrdering, false).unwrap();
        let min = constructor.construct(&DefaultOrdering, true).unwrap();
        assert!(close(raw.probability(), 0.6));
        assert!(close(min.probability(), 0.6));
    }

    #[test]
    fn test_probability_zero_events() {
        let tree = example_tree();
        let bdd = BddConstructor::new(&tree).construct(&DefaultOrdering, true).unwrap();
        assert_eq!(bdd.probability(), 0.0);
    }

    #[test]
    fn test_sat_count_example() {
        // Count the failing states of the example tree by brute force.
        let tree = example_tree();
        let expected = (0u32..256)
            .filter(|bits| {
                let states: Vec<bool> = (0..8).map(|i| bits & (1 << i) != 0).collect();
                tree.evaluate(&states)
            })
            .count();

        let constructor = BddConstructor::new(&tree);
        let raw = constructor.construct(&DefaultOrdering, false).unwrap();
        let min = constructor.construct(&DefaultOrdering, true).unwrap();
        assert_eq!(raw.sat_count(8), BigUint::from(expected));
        assert_eq!(min.sat_count(8), BigUint::from(expected));
    }

    #[test]
    fn test_one_sat() {
        let tree = example_tree();
        let bdd = BddConstructor::new(&tree).construct(&DefaultOrdering, true).unwrap();
        let path = bdd.one_sat().unwrap();
        let mut states = tree.false_state();
        for (e, value) in path {
            states[e.index()] = value;
        }
        assert!(tree.evaluate(&states));
    }

    #[test]
    fn test_one_sat_unsatisfiable() {
        let mut b = FaultTreeBuilder::new();
        let x = b.basic_event("x").unwrap();
        let not_x = b.not("not_x", x).unwrap();
        let top = b.and("top", [x, not_x]).unwrap();
        let tree = b.build("t", top).unwrap();

        let bdd = BddConstructor::new(&tree).construct(&DefaultOrdering, true).unwrap();
        assert_eq!(bdd.root(), NodeId::FALSE);
        assert_eq!(bdd.one_sat(), None);
        assert_eq!(bdd.sat_count(1), BigUint::ZERO);
    }
}
