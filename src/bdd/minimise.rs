//! Reduction of a BDD to its shared, minimal form.

use std::collections::HashMap;

use log::info;

use crate::bdd::{Bdd, Node};
use crate::types::NodeId;

impl Bdd {
    /// Returns a new diagram with redundant tests removed and equal sub-graphs shared.
    ///
    /// A node whose every path ends in the same leaf collapses into that leaf,
    /// and two nodes testing the same event with the same children become one.
    /// The represented function does not change.
    pub fn minimise(&self) -> Bdd {
        let mut result = Bdd::new(self.variables.clone());
        let mut cache = HashMap::new();
        let root = self.rebuild(self.root, &mut result, &mut cache);
        result.set_root(root);
        info!(
            "Minimised BDD: {} -> {} decision nodes",
            self.size(self.root),
            result.size(root)
        );
        result
    }

    fn rebuild(&self, node: NodeId, into: &mut Bdd, cache: &mut HashMap<NodeId, NodeId>) -> NodeId {
        if let Some(&id) = cache.get(&node) {
            return id;
        }
        let id = match self.node(node) {
            Node::Leaf(value) => NodeId::leaf(value),
            Node::Decision { var, low, high } => {
                let low = self.rebuild(low, into, cache);
                let high = self.rebuild(high, into, cache);
                into.mk_node(var, low, high)
            }
        };
        cache.insert(node, id);
        id
    }
}

/// Free-function form of [`Bdd::minimise`].
pub fn minimise(bdd: &Bdd) -> Bdd {
    bdd.minimise()
}
