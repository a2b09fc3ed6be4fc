//! Drawing fault trees.

use std::collections::HashSet;
use std::path::PathBuf;

use log::debug;

use crate::error::Result;
use crate::faulttree::{FaultTree, GateKind};
use crate::print::{Figure, FigureEdge, FigureNode, PrettyPrint};
use crate::types::GateId;

/// Appearance of a drawn fault tree.
///
/// # Examples
///
/// ```
/// use ftbdd::print::FaultTreeStyle;
///
/// let style = FaultTreeStyle {
///     image_dir: Some("img".into()),
///     ..FaultTreeStyle::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct FaultTreeStyle {
    /// Directory with gate pictures named `andgate.png`, `orgate.png`, `notgate.png`,
    /// `xorgate.png` and `votgate.png`. Gates are drawn as shapes when unset (default).
    pub image_dir: Option<PathBuf>,
    /// Color of the bold gate labels (default: "#4d4d4d")
    pub label_color: &'static str,
    /// Fill of basic events that are on, and of edges into true gates (default: "#008000")
    pub on_color: &'static str,
    /// Fill of basic events that are off, and of edges into false gates (default: "#ff0000")
    pub off_color: &'static str,
    /// Width of the edges (default: 3)
    pub edge_width: f64,
    pub event_shape: &'static str,
    pub and_shape: &'static str,
    pub or_shape: &'static str,
    pub not_shape: &'static str,
    pub xor_shape: &'static str,
    pub vot_shape: &'static str,
}

impl Default for FaultTreeStyle {
    fn default() -> Self {
        Self {
            image_dir: None,
            label_color: "#4d4d4d",
            on_color: "#008000",
            off_color: "#ff0000",
            edge_width: 3.0,
            event_shape: "circle",
            and_shape: "box",
            or_shape: "ellipse",
            not_shape: "diamond",
            xor_shape: "hexagon",
            vot_shape: "octagon",
        }
    }
}

impl FaultTreeStyle {
    fn shape(&self, kind: GateKind) -> &'static str {
        match kind {
            GateKind::Basic(_) => self.event_shape,
            GateKind::And => self.and_shape,
            GateKind::Or => self.or_shape,
            GateKind::Not => self.not_shape,
            GateKind::Xor => self.xor_shape,
            GateKind::Vot { .. } => self.vot_shape,
        }
    }

    fn image(&self, kind: GateKind) -> Option<PathBuf> {
        let dir = self.image_dir.as_ref()?;
        match kind {
            GateKind::Basic(_) => None,
            kind => Some(dir.join(format!("{}gate.png", kind.type_name().to_ascii_lowercase()))),
        }
    }
}

/// Draws a fault tree in its current state.
///
/// Every gate reachable from the top is drawn once, basic events as circles
/// filled by their state. Edges are colored by the value of the gate they lead
/// to, so the failing paths stand out.
#[derive(Debug)]
pub struct FaultTreePrinter<'a> {
    tree: &'a FaultTree,
    style: FaultTreeStyle,
}

impl<'a> FaultTreePrinter<'a> {
    pub fn new(tree: &'a FaultTree) -> Self {
        Self::with_style(tree, FaultTreeStyle::default())
    }

    pub fn with_style(tree: &'a FaultTree, style: FaultTreeStyle) -> Self {
        Self { tree, style }
    }

    pub fn style(&self) -> &FaultTreeStyle {
        &self.style
    }

    fn node_id(gate: GateId) -> String {
        gate.to_string()
    }
}

impl PrettyPrint for FaultTreePrinter<'_> {
    fn prepare(&self) -> Result<Figure> {
        let tree = self.tree;
        let style = &self.style;
        let values = tree.values(&tree.states());
        let mut figure = Figure::new(tree.name());

        let reachable = tree.reachable();
        for &id in reachable.iter() {
            let gate = tree.gate(id);
            let mut node = FigureNode::new(Self::node_id(id), gate.label(), style.shape(gate.kind()));
            node.bold = true;
            node.font_color = Some(style.label_color);
            if let Some(e) = gate.event() {
                let on = tree.basic_event(e).state;
                node.fill = Some(if on { style.on_color } else { style.off_color });
            } else {
                node.image = style.image(gate.kind());
            }
            figure.add_node(node);
        }

        let mut drawn = HashSet::new();
        for &id in reachable.iter() {
            for &input in tree.gate(id).inputs() {
                if !drawn.insert((id, input)) {
                    continue;
                }
                let mut edge = FigureEdge::new(Self::node_id(id), Self::node_id(input));
                edge.color = Some(if values[input.index()] {
                    style.on_color
                } else {
                    style.off_color
                });
                edge.width = Some(style.edge_width);
                figure.add_edge(edge);
            }
        }

        debug!(
            "Prepared fault tree {:?}: {} nodes, {} edges",
            tree.name(),
            figure.nodes().len(),
            figure.edges().len()
        );
        Ok(figure)
    }
}
