//! Binary Decision Diagrams over the basic events of a fault tree.
//!
//! A [`Bdd`] owns an arena of [`Node`]s and a root. Ids 0 and 1 are always the
//! `false` and `true` leaves; every other node tests one basic event and has a
//! `low` (event off) and `high` (event on) child.
//!
//! Nodes can be created in two ways:
//!
//! - [`Bdd::alloc`] appends a node as is. The [`BddConstructor`] uses it, so the
//!   freshly constructed diagram is a decision tree without any sharing.
//! - [`Bdd::mk_node`] hash-conses nodes through a unique table and drops tests
//!   whose children are equal. The [minimiser][crate::bdd::minimise] rebuilds a
//!   diagram through it.
//!
//! [`BddConstructor`]: crate::bdd::construct::BddConstructor

pub mod construct;
pub mod minimise;
pub mod sat;

use std::collections::HashMap;
use std::fmt::Debug;

use log::debug;

use crate::faulttree::FaultTree;
use crate::types::{EventId, NodeId};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Node {
    Leaf(bool),
    Decision { var: EventId, low: NodeId, high: NodeId },
}

/// A BDD variable: the basic event it stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub probability: f64,
}

#[derive(Clone)]
pub struct Bdd {
    nodes: Vec<Node>,
    unique: HashMap<Node, NodeId>,
    variables: Vec<Variable>,
    root: NodeId,
}

impl Bdd {
    /// Creates an empty diagram (the constant `false`) over the given variables.
    pub fn new(variables: Vec<Variable>) -> Self {
        Self {
            nodes: vec![Node::Leaf(false), Node::Leaf(true)],
            unique: HashMap::new(),
            variables,
            root: NodeId::FALSE,
        }
    }

    /// Creates an empty diagram whose variables are the basic events of `tree`.
    pub fn for_tree(tree: &FaultTree) -> Self {
        let variables = tree
            .events()
            .map(|(e, event)| Variable {
                name: tree.event_name(e).to_string(),
                probability: event.probability,
            })
            .collect();
        Self::new(variables)
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bdd")
            .field("root", &self.root)
            .field("nodes", &self.nodes.len())
            .field("unique", &self.unique.len())
            .field("variables", &self.variables.len())
            .finish()
    }
}

impl Bdd {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        assert!(root.index() < self.nodes.len(), "root {} is not allocated", root);
        self.root = root;
    }

    pub fn node(&self, id: NodeId) -> Node {
        self.nodes[id.index()]
    }

    /// Number of allocated nodes, leaves included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, var: EventId) -> &Variable {
        &self.variables[var.index()]
    }

    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    pub fn low(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id) {
            Node::Decision { low, .. } => Some(low),
            Node::Leaf(_) => None,
        }
    }

    pub fn high(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id) {
            Node::Decision { high, .. } => Some(high),
            Node::Leaf(_) => None,
        }
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        id.is_leaf()
    }

    /// Display name of a node: the event name, or `0`/`1` for the leaves.
    pub fn label(&self, id: NodeId) -> &str {
        match self.node(id) {
            Node::Leaf(false) => "0",
            Node::Leaf(true) => "1",
            Node::Decision { var, .. } => &self.variable(var).name,
        }
    }

    /// Appends a decision node without sharing or reduction.
    pub fn alloc(&mut self, var: EventId, low: NodeId, high: NodeId) -> NodeId {
        assert!(var.index() < self.variables.len(), "variable {} out of range", var);
        assert!(low.index() < self.nodes.len() && high.index() < self.nodes.len());
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node::Decision { var, low, high });
        id
    }

    /// Returns the canonical node for `(var, low, high)`.
    pub fn mk_node(&mut self, var: EventId, low: NodeId, high: NodeId) -> NodeId {
        debug!("mk(var = {}, low = {}, high = {})", var, low, high);

        // Handle redundant tests
        if low == high {
            debug!("mk: redundant {} == {}", low, high);
            return low;
        }

        let node = Node::Decision { var, low, high };
        if let Some(&id) = self.unique.get(&node) {
            debug!("mk: shared {}", id);
            return id;
        }

        let id = self.alloc(var, low, high);
        self.unique.insert(node, id);
        id
    }

    /// All nodes reachable from `root`, in depth-first pre-order (high child first).
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut visited[id.index()], true) {
                continue;
            }
            order.push(id);
            if let Node::Decision { low, high, .. } = self.node(id) {
                stack.push(low);
                stack.push(high);
            }
        }

        order
    }

    /// Number of decision nodes reachable from `root`.
    pub fn size(&self, root: NodeId) -> usize {
        self.descendants(root).into_iter().filter(|id| !id.is_leaf()).count()
    }

    /// Follows the path chosen by `assignment` (indexed by [`EventId`]) from the root.
    pub fn evaluate(&self, assignment: &[bool]) -> bool {
        let mut current = self.root;
        loop {
            match self.node(current) {
                Node::Leaf(value) => return value,
                Node::Decision { var, low, high } => {
                    current = if assignment[var.index()] { high } else { low };
                }
            }
        }
    }

    pub fn to_bracket_string(&self, node: NodeId) -> String {
        match self.node(node) {
            Node::Leaf(value) => format!("({})", value as u8),
            Node::Decision { var, low, high } => format!(
                "{}:({}, {}, {})",
                node,
                self.variable(var).name,
                self.to_bracket_string(high),
                self.to_bracket_string(low)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn vars(names: &[&str]) -> Vec<Variable> {
        names
            .iter()
            .map(|n| Variable {
                name: n.to_string(),
                probability: 0.5,
            })
            .collect()
    }

    #[test]
    fn test_leaves() {
        let bdd = Bdd::new(vars(&["a"]));
        assert_eq!(bdd.node(NodeId::FALSE), Node::Leaf(false));
        assert_eq!(bdd.node(NodeId::TRUE), Node::Leaf(true));
        assert_eq!(bdd.root(), NodeId::FALSE);
        assert_eq!(bdd.label(NodeId::FALSE), "0");
        assert_eq!(bdd.label(NodeId::TRUE), "1");
        assert_eq!(bdd.low(NodeId::TRUE), None);
    }

    #[test]
    fn test_mk_node_redundant() {
        let mut bdd = Bdd::new(vars(&["a"]));
        let a = EventId::new(0);
        assert_eq!(bdd.mk_node(a, NodeId::TRUE, NodeId::TRUE), NodeId::TRUE);
        assert_eq!(bdd.num_nodes(), 2);
    }

    #[test]
    fn test_mk_node_shared() {
        let mut bdd = Bdd::new(vars(&["a"]));
        let a = EventId::new(0);
        let x = bdd.mk_node(a, NodeId::FALSE, NodeId::TRUE);
        let y = bdd.mk_node(a, NodeId::FALSE, NodeId::TRUE);
        assert_eq!(x, y);
        assert_eq!(bdd.num_nodes(), 3);
        assert_eq!(bdd.label(x), "a");
    }

    #[test]
    fn test_alloc_not_shared() {
        let mut bdd = Bdd::new(vars(&["a"]));
        let a = EventId::new(0);
        let x = bdd.alloc(a, NodeId::FALSE, NodeId::TRUE);
        let y = bdd.alloc(a, NodeId::FALSE, NodeId::TRUE);
        assert_ne!(x, y);
    }

    #[test]
    fn test_descendants_and_evaluate() {
        // a AND b
        let mut bdd = Bdd::new(vars(&["a", "b"]));
        let b = bdd.mk_node(EventId::new(1), NodeId::FALSE, NodeId::TRUE);
        let f = bdd.mk_node(EventId::new(0), NodeId::FALSE, b);
        bdd.set_root(f);

        assert_eq!(bdd.descendants(f), vec![f, b, NodeId::TRUE, NodeId::FALSE]);
        assert_eq!(bdd.size(f), 2);

        assert!(bdd.evaluate(&[true, true]));
        assert!(!bdd.evaluate(&[true, false]));
        assert!(!bdd.evaluate(&[false, true]));
        assert_eq!(bdd.to_bracket_string(f), format!("{}:(a, {}:(b, (1), (0)), (0))", f, b));
    }
}
