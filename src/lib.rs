//! # ftbdd: fault trees, BDDs, and pretty pictures of both
//!
//! **`ftbdd`** reads fault trees, translates them into **Binary Decision Diagrams (BDDs)**
//! and draws either structure with Graphviz.
//!
//! ## What is a fault tree?
//!
//! A fault tree models how failures of components (the *basic events*) combine through
//! logic gates (AND, OR, voting, ...) into the failure of a whole system (the *top event*).
//! Its BDD represents the same Boolean function as a DAG of decisions, one basic event at
//! a time, which makes questions like "how likely is the top event?" cheap to answer.
//!
//! ## Basic Usage
//!
//! ```rust
//! use ftbdd::bdd::construct::BddConstructor;
//! use ftbdd::faulttree::FaultTreeBuilder;
//! use ftbdd::ordering::BfsOrdering;
//! use ftbdd::print::{BddPrinter, FaultTreePrinter, PrettyPrint, RenderOptions};
//!
//! // 1. Build a fault tree
//! let mut builder = FaultTreeBuilder::new();
//! let pump = builder.basic_event_with("pump", false, 0.1).unwrap();
//! let valve = builder.basic_event_with("valve", false, 0.2).unwrap();
//! let top = builder.and("SYSTEM", [pump, valve]).unwrap();
//! let tree = builder.build("cooling", top).unwrap();
//!
//! // 2. Construct its (minimised) BDD
//! let bdd = BddConstructor::new(&tree)
//!     .construct(&BfsOrdering::default(), true)
//!     .unwrap();
//! assert!((bdd.probability() - 0.02).abs() < 1e-12);
//!
//! // 3. Draw both
//! let options = RenderOptions::default();
//! let tree_dot = FaultTreePrinter::new(&tree).to_dot(&options).unwrap();
//! let bdd_dot = BddPrinter::new(&bdd).to_dot(&options).unwrap();
//! assert!(tree_dot.contains("SYSTEM"));
//! assert!(bdd_dot.contains("rank=sink"));
//! ```
//!
//! ## Core Components
//!
//! - **[`faulttree`]**: The [`FaultTree`][crate::faulttree::FaultTree] arena, its builder, and the Galileo reader.
//! - **[`bdd`]**: The [`Bdd`][crate::bdd::Bdd] arena, construction from fault trees, and minimisation.
//! - **[`ordering`]**: Variable ordering heuristics.
//! - **[`print`]**: The [`PrettyPrint`][crate::print::PrettyPrint] trait and printers for both structures.
//! - **[`analysis`]**: Size statistics and ordering benchmarks.

pub mod analysis;
pub mod bdd;
pub mod error;
pub mod faulttree;
pub mod ordering;
pub mod print;
pub mod types;
