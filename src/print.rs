//! Pretty-printing of fault trees and BDDs as images.
//!
//! A printer implements [`PrettyPrint::prepare`], which turns the structure it
//! wraps into a [`Figure`]: an ordered list of styled nodes and edges. The
//! provided methods take it from there:
//!
//! - [`PrettyPrint::print_to_file`] lays the figure out with a Graphviz engine
//!   and writes the image to a path; the format follows the file extension.
//! - [`PrettyPrint::print_to_window`] renders to a temporary image and opens it
//!   in the platform viewer.
//!
//! Writing `.dot`/`.gv` files does not need Graphviz at all.
//!
//! # Examples
//!
//! ```no_run
//! use ftbdd::faulttree::galileo;
//! use ftbdd::print::{FaultTreePrinter, PrettyPrint, RenderOptions};
//!
//! let tree = galileo::read_file("pumps.dft")?;
//! let printer = FaultTreePrinter::new(&tree);
//! printer.print_to_file("pumps.svg".as_ref(), &RenderOptions::default())?;
//! # Ok::<(), ftbdd::error::Error>(())
//! ```

pub mod bdd;
pub mod benchmark;
pub mod dot;
pub mod faulttree;
pub mod graphviz;
pub mod layout;
pub mod window;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::info;

pub use self::bdd::{BddPrinter, BddStyle};
pub use self::benchmark::BenchmarkChart;
pub use self::faulttree::{FaultTreePrinter, FaultTreeStyle};
pub use self::layout::Layout;
use crate::error::{Error, Result};

/// Rank constraint for a node.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Rank {
    /// Top of the drawing.
    Source,
    /// Bottom of the drawing.
    Sink,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FigureNode {
    pub id: String,
    pub label: String,
    pub shape: &'static str,
    pub fill: Option<&'static str>,
    pub border: Option<&'static str>,
    pub font_color: Option<&'static str>,
    pub bold: bool,
    /// The label is Graphviz HTML markup, emitted without escaping.
    pub html: bool,
    pub image: Option<PathBuf>,
    pub rank: Option<Rank>,
}

impl FigureNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, shape: &'static str) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shape,
            fill: None,
            border: None,
            font_color: None,
            bold: false,
            html: false,
            image: None,
            rank: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FigureEdge {
    pub from: String,
    pub to: String,
    pub style: &'static str,
    pub color: Option<&'static str>,
    pub width: Option<f64>,
}

impl FigureEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            style: "solid",
            color: None,
            width: None,
        }
    }
}

/// A styled graph, ready to be laid out.
///
/// Nodes are unique by id and kept in insertion order. Edges are kept as
/// given, so two edges between the same pair of nodes are both drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Figure {
    name: String,
    nodes: Vec<FigureNode>,
    edges: Vec<FigureEdge>,
    index: HashMap<String, usize>,
}

impl Figure {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[FigureNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[FigureEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&FigureNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Adds a node. Returns `false` (and keeps the existing node) if the id is already present.
    pub fn add_node(&mut self, node: FigureNode) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Adds an edge between two nodes already in the figure.
    pub fn add_edge(&mut self, edge: FigureEdge) {
        assert!(self.index.contains_key(&edge.from), "unknown edge source {:?}", edge.from);
        assert!(self.index.contains_key(&edge.to), "unknown edge target {:?}", edge.to);
        self.edges.push(edge);
    }
}

/// Output options shared by all printers.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Graphviz layout engine (default: "dot").
    pub engine: String,
    /// Resolution of raster output (default: engine default).
    pub dpi: Option<u32>,
    /// Maximum drawing size in inches (default: 10 x 10).
    pub size: (f64, f64),
    /// Program used to open images in window mode (default: platform viewer).
    pub viewer: Option<String>,
    /// Font size of the labels (default: 13).
    pub font_size: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            engine: "dot".to_string(),
            dpi: None,
            size: (10.0, 10.0),
            viewer: None,
            font_size: 13.0,
        }
    }
}

/// Output format of a file, derived from its extension.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Format {
    /// DOT source, written without running the engine.
    Dot,
    /// Anything the engine renders, by its `-T` name.
    Engine(&'static str),
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| Error::UnsupportedFormat { path: path.to_path_buf() })?;
        let format = match extension.as_str() {
            "dot" | "gv" => Format::Dot,
            "svg" => Format::Engine("svg"),
            "png" => Format::Engine("png"),
            "pdf" => Format::Engine("pdf"),
            "jpg" | "jpeg" => Format::Engine("jpg"),
            "gif" => Format::Engine("gif"),
            "bmp" => Format::Engine("bmp"),
            "ps" => Format::Engine("ps"),
            "eps" => Format::Engine("eps"),
            "json" => Format::Engine("json"),
            "plain" => Format::Engine("plain"),
            _ => return Err(Error::UnsupportedFormat { path: path.to_path_buf() }),
        };
        Ok(format)
    }
}

/// Something that can be drawn.
pub trait PrettyPrint {
    /// Builds the figure: which nodes and edges to draw and how.
    fn prepare(&self) -> Result<Figure>;

    fn to_dot(&self, options: &RenderOptions) -> Result<String> {
        let figure = self.prepare()?;
        Ok(dot::to_dot(&figure, options)?)
    }

    /// Node positions and edge routes as computed by the engine.
    fn layout(&self, options: &RenderOptions) -> Result<Layout> {
        let dot = self.to_dot(options)?;
        let plain = graphviz::render(&dot, &options.engine, "plain")?;
        Layout::parse(&String::from_utf8_lossy(&plain))
    }

    /// Renders the figure into `path`, replacing any existing file.
    ///
    /// On failure nothing is left at `path`.
    fn print_to_file(&self, path: &Path, options: &RenderOptions) -> Result<()> {
        let format = Format::from_path(path)?;
        let dot = self.to_dot(options)?;
        let bytes = match format {
            Format::Dot => dot.into_bytes(),
            Format::Engine(name) => graphviz::render(&dot, &options.engine, name)?,
        };
        graphviz::write_atomic(path, &bytes)?;
        info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Renders the figure and opens it in an image viewer, without waiting for it.
    fn print_to_window(&self, options: &RenderOptions) -> Result<()> {
        window::check_display()?;
        let dot = self.to_dot(options)?;
        let bytes = graphviz::render(&dot, &options.engine, "png")?;
        let path = window::temp_image(&bytes, "png")?;
        window::open(&path, options.viewer.as_deref())
    }
}
