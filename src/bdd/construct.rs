//! Construction of a BDD from a fault tree by Shannon expansion.

use log::{debug, info};

use crate::bdd::Bdd;
use crate::error::Result;
use crate::faulttree::FaultTree;
use crate::ordering::{self, VariableOrdering};
use crate::types::{EventId, NodeId};

/// Translates a [`FaultTree`] into a [`Bdd`].
///
/// Starting with every basic event off, the constructor switches the events on
/// and off in the given order and evaluates the tree for each partial state.
/// Each expansion step becomes a decision node; the tree's value once the
/// order is exhausted becomes a leaf. For coherent trees the expansion stops
/// as soon as the tree fails, since switching more events on cannot repair it.
///
/// The resulting diagram is a decision tree. Pass `minimise = true` (or call
/// [`Bdd::minimise`]) to obtain the shared, reduced form.
#[derive(Debug)]
pub struct BddConstructor<'a> {
    tree: &'a FaultTree,
}

impl<'a> BddConstructor<'a> {
    pub fn new(tree: &'a FaultTree) -> Self {
        Self { tree }
    }

    /// Orders the variables with `ordering`, then constructs the BDD.
    pub fn construct(&self, ordering: &dyn VariableOrdering, minimise: bool) -> Result<Bdd> {
        let order = ordering.order(self.tree)?;
        debug!("{} ordering: {:?}", ordering.name(), order);
        let bdd = self.construct_with(&order)?;
        if minimise {
            Ok(bdd.minimise())
        } else {
            Ok(bdd)
        }
    }

    /// Constructs the (non-minimised) BDD for an explicit variable order.
    pub fn construct_with(&self, order: &[EventId]) -> Result<Bdd> {
        ordering::validate(self.tree, order)?;

        let mut bdd = Bdd::for_tree(self.tree);
        let mut state = self.tree.false_state();
        let coherent = self.tree.is_coherent();
        let root = self.expand(&mut bdd, order, &mut state, coherent);
        bdd.set_root(root);

        info!(
            "Constructed BDD for {:?}: {} decision nodes over {} variables",
            self.tree.name(),
            bdd.size(root),
            order.len()
        );
        Ok(bdd)
    }

    fn expand(&self, bdd: &mut Bdd, order: &[EventId], state: &mut [bool], coherent: bool) -> NodeId {
        let holds = self.tree.evaluate(state);
        let Some((&var, rest)) = order.split_first() else {
            return NodeId::leaf(holds);
        };
        if coherent && holds {
            return NodeId::TRUE;
        }

        state[var.index()] = true;
        let high = self.expand(bdd, rest, state, coherent);
        state[var.index()] = false;
        let low = self.expand(bdd, rest, state, coherent);

        bdd.alloc(var, low, high)
    }
}
