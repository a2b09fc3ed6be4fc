//! Type-safe indices into the fault tree and BDD arenas.
//!
//! Gates, basic events and BDD nodes all live in flat vectors. These newtypes
//! keep the three index spaces apart, so a gate index can never be used to
//! look up a BDD node by accident.
use std::fmt;

/// Index of a gate (including basic events) in a [`FaultTree`][crate::faulttree::FaultTree].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GateId(u32);

impl GateId {
    pub const fn new(index: u32) -> Self {
        GateId(index)
    }

    /// Returns the position of the gate in the arena.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Index of a basic event, which is also a BDD variable.
///
/// Events are numbered in the order they were added to the fault tree.
/// Unlike a position in a variable ordering, the id of an event is stable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EventId(u32);

impl EventId {
    pub const fn new(index: u32) -> Self {
        EventId(index)
    }

    /// Returns the position of the event in the event list (and in a state vector).
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Index of a node in a [`Bdd`][crate::bdd::Bdd].
///
/// # Invariants
///
/// - `NodeId::FALSE` (0) and `NodeId::TRUE` (1) are the two leaves of every BDD
/// - All other ids point to decision nodes
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const FALSE: NodeId = NodeId(0);
    pub const TRUE: NodeId = NodeId(1);

    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Returns the leaf for the given value.
    pub const fn leaf(value: bool) -> Self {
        if value {
            NodeId::TRUE
        } else {
            NodeId::FALSE
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_leaf(self) -> bool {
        self.0 <= 1
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}
