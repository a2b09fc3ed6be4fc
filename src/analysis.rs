//! BDD size statistics and ordering benchmarks.

use std::fmt;
use std::time::{Duration, Instant};

use log::info;

use crate::bdd::construct::BddConstructor;
use crate::bdd::Bdd;
use crate::error::Result;
use crate::faulttree::FaultTree;
use crate::ordering::VariableOrdering;
use crate::types::EventId;

/// Node and edge counts of a BDD.
///
/// The two leaves are always counted, and every decision node has exactly two
/// outgoing edges.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BddStats {
    pub nodes: usize,
    pub edges: usize,
}

impl BddStats {
    pub fn of(bdd: &Bdd) -> Self {
        let decisions = bdd.size(bdd.root());
        Self {
            nodes: decisions + 2,
            edges: 2 * decisions,
        }
    }
}

impl fmt::Display for BddStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} nodes, {} edges", self.nodes, self.edges)
    }
}

/// Measurements for one variable ordering.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub ordering_name: String,
    pub ordering: Vec<EventId>,
    pub ordering_time: Duration,
    pub construction_time: Duration,
    pub minimising_time: Duration,
    pub bdd: Bdd,
    pub min_bdd: Bdd,
}

impl BenchmarkResult {
    pub fn bdd_nodes(&self) -> usize {
        BddStats::of(&self.bdd).nodes
    }

    pub fn min_bdd_nodes(&self) -> usize {
        BddStats::of(&self.min_bdd).nodes
    }
}

impl fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timings:")?;
        writeln!(f, "    Ordering:      {:?}", self.ordering_time)?;
        writeln!(f, "    Construction:  {:?}", self.construction_time)?;
        writeln!(f, "    Minimising:    {:?}", self.minimising_time)?;
        writeln!(f, "Nodes:")?;
        writeln!(f, "    Not minimised: {}", self.bdd_nodes())?;
        write!(f, "    Minimised:     {}", self.min_bdd_nodes())
    }
}

/// Compares variable orderings on one fault tree.
///
/// # Examples
///
/// ```
/// use ftbdd::analysis::Benchmark;
/// use ftbdd::faulttree::galileo;
/// use ftbdd::ordering::{BfsOrdering, DefaultOrdering};
///
/// let tree = galileo::parse("toplevel T;\nT or a b;\na;\nb;\n").unwrap();
/// let mut benchmark = Benchmark::new(&tree);
/// benchmark.run(&[&DefaultOrdering, &BfsOrdering::default()]).unwrap();
/// assert_eq!(benchmark.results().len(), 2);
/// println!("{}", benchmark);
/// ```
#[derive(Debug)]
pub struct Benchmark<'a> {
    tree: &'a FaultTree,
    results: Vec<BenchmarkResult>,
}

impl<'a> Benchmark<'a> {
    pub fn new(tree: &'a FaultTree) -> Self {
        Self {
            tree,
            results: Vec::new(),
        }
    }

    pub fn tree(&self) -> &FaultTree {
        self.tree
    }

    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }

    /// Runs every ordering and appends its measurements to the results.
    pub fn run(&mut self, orderings: &[&dyn VariableOrdering]) -> Result<()> {
        for ordering in orderings {
            let result = self.run_one(*ordering)?;
            info!(
                "{}: {} -> {} nodes",
                result.ordering_name,
                result.bdd_nodes(),
                result.min_bdd_nodes()
            );
            self.results.push(result);
        }
        Ok(())
    }

    fn run_one(&self, ordering: &dyn VariableOrdering) -> Result<BenchmarkResult> {
        let start = Instant::now();
        let order = ordering.order(self.tree)?;
        let ordering_time = start.elapsed();

        let start = Instant::now();
        let bdd = BddConstructor::new(self.tree).construct_with(&order)?;
        let construction_time = start.elapsed();

        let start = Instant::now();
        let min_bdd = bdd.minimise();
        let minimising_time = start.elapsed();

        Ok(BenchmarkResult {
            ordering_name: ordering.name().to_string(),
            ordering: order,
            ordering_time,
            construction_time,
            minimising_time,
            bdd,
            min_bdd,
        })
    }
}

impl fmt::Display for Benchmark<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Benchmark for {}", self.tree.name())?;
        for result in self.results.iter() {
            writeln!(f, "{}", result.ordering_name)?;
            writeln!(f, "{}", result)?;
            writeln!(f, "------------------------------")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::faulttree::tests::example_tree;
    use crate::faulttree::FaultTreeBuilder;
    use crate::ordering::{BfsOrdering, DefaultOrdering, ManualOrdering, SubTreeComplexity};

    #[test]
    fn test_stats_single_leaf() {
        let mut b = FaultTreeBuilder::new();
        let x = b.basic_event("x").unwrap();
        let not_x = b.not("not_x", x).unwrap();
        let top = b.and("top", [x, not_x]).unwrap();
        let tree = b.build("t", top).unwrap();

        let bdd = BddConstructor::new(&tree).construct(&DefaultOrdering, true).unwrap();
        assert_eq!(BddStats::of(&bdd), BddStats { nodes: 2, edges: 0 });
    }

    #[test]
    fn test_stats_example() {
        let tree = example_tree();
        let ordering = ManualOrdering::new(["1", "2", "6", "7", "8", "3", "4", "5"]);
        let bdd = BddConstructor::new(&tree).construct(&ordering, true).unwrap();
        let stats = BddStats::of(&bdd);
        assert_eq!(stats, BddStats { nodes: 10, edges: 16 });
        assert_eq!(stats.to_string(), "10 nodes, 16 edges");
    }

    #[test]
    fn test_benchmark() {
        let tree = example_tree();
        let mut benchmark = Benchmark::new(&tree);
        benchmark
            .run(&[&DefaultOrdering, &BfsOrdering::default(), &SubTreeComplexity])
            .unwrap();

        let results = benchmark.results();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].ordering_name, "Default");
        for result in results {
            assert!(result.min_bdd_nodes() <= result.bdd_nodes());
            assert_eq!(result.ordering.len(), 8);
        }

        let report = benchmark.to_string();
        assert!(report.contains("Sub-Tree Complexity"));
        assert!(report.contains("Minimised:"));
    }

    #[test]
    fn test_benchmark_propagates_errors() {
        let tree = example_tree();
        let mut benchmark = Benchmark::new(&tree);
        let bad = ManualOrdering::new(["nope"]);
        assert!(benchmark.run(&[&bad]).is_err());
        assert!(benchmark.results().is_empty());
    }
}
