//! Drawing BDDs.

use log::debug;

use crate::bdd::{Bdd, Node};
use crate::error::Result;
use crate::print::{Figure, FigureEdge, FigureNode, PrettyPrint, Rank};
use crate::types::NodeId;

/// Appearance of a drawn BDD.
#[derive(Debug, Clone)]
pub struct BddStyle {
    /// Shape for decision nodes (default: "circle")
    pub node_shape: &'static str,
    /// Shape for the leaves (default: "box")
    pub leaf_shape: &'static str,
    /// Style for high (event on) edges (default: "solid")
    pub high_edge_style: &'static str,
    /// Style for low (event off) edges (default: "dashed")
    pub low_edge_style: &'static str,
    /// Fill of all nodes (default: "#ffffff")
    pub fill_color: &'static str,
    /// Border of all nodes (default: "#000000")
    pub border_color: &'static str,
}

impl Default for BddStyle {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            leaf_shape: "box",
            high_edge_style: "solid",
            low_edge_style: "dashed",
            fill_color: "#ffffff",
            border_color: "#000000",
        }
    }
}

/// Draws the nodes reachable from the root of a BDD.
///
/// The leaves sit on the bottom rank and are shared by every path that ends
/// in them. A node whose children are the same node gets two parallel edges.
#[derive(Debug)]
pub struct BddPrinter<'a> {
    bdd: &'a Bdd,
    style: BddStyle,
}

impl<'a> BddPrinter<'a> {
    pub fn new(bdd: &'a Bdd) -> Self {
        Self::with_style(bdd, BddStyle::default())
    }

    pub fn with_style(bdd: &'a Bdd, style: BddStyle) -> Self {
        Self { bdd, style }
    }

    pub fn style(&self) -> &BddStyle {
        &self.style
    }

    fn node_id(id: NodeId) -> String {
        format!("n{}", id.index())
    }
}

impl PrettyPrint for BddPrinter<'_> {
    fn prepare(&self) -> Result<Figure> {
        let bdd = self.bdd;
        let style = &self.style;
        let mut figure = Figure::new("BDD");

        let nodes = bdd.descendants(bdd.root());
        for &id in nodes.iter() {
            let shape = if id.is_leaf() { style.leaf_shape } else { style.node_shape };
            let mut node = FigureNode::new(Self::node_id(id), bdd.label(id), shape);
            node.fill = Some(style.fill_color);
            node.border = Some(style.border_color);
            if id.is_leaf() {
                node.rank = Some(Rank::Sink);
            }
            figure.add_node(node);
        }

        for &id in nodes.iter() {
            if let Node::Decision { low, high, .. } = bdd.node(id) {
                let mut edge = FigureEdge::new(Self::node_id(id), Self::node_id(high));
                edge.style = style.high_edge_style;
                figure.add_edge(edge);

                let mut edge = FigureEdge::new(Self::node_id(id), Self::node_id(low));
                edge.style = style.low_edge_style;
                figure.add_edge(edge);
            }
        }

        debug!(
            "Prepared BDD: {} nodes, {} edges",
            figure.nodes().len(),
            figure.edges().len()
        );
        Ok(figure)
    }
}
