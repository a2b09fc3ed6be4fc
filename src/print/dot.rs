//! Figure to DOT (Graphviz) conversion.
//!
//! The generated graph is a `digraph` so that the engine ranks parents above
//! their children, with arrow heads switched off globally. Nodes with a
//! [`Rank`] are grouped into `rank=source` / `rank=sink` subgraphs, and bold
//! labels are emitted as HTML labels.

use std::fmt::Write as _;

use crate::print::{Figure, FigureEdge, FigureNode, Rank, RenderOptions};

/// Converts a figure to DOT source.
pub fn to_dot(figure: &Figure, options: &RenderOptions) -> Result<String, std::fmt::Error> {
    let mut dot = String::new();
    writeln!(dot, "digraph {} {{", quote(figure.name()))?;

    let (width, height) = options.size;
    write!(dot, "graph [size=\"{},{}\"", width, height)?;
    if let Some(dpi) = options.dpi {
        write!(dot, ", dpi={}", dpi)?;
    }
    writeln!(dot, "];")?;
    writeln!(dot, "node [fontsize={}];", options.font_size)?;
    writeln!(dot, "edge [dir=none];")?;

    for node in figure.nodes() {
        write_node(&mut dot, node)?;
    }

    for (rank, name) in [(Rank::Source, "source"), (Rank::Sink, "sink")] {
        let ids: Vec<&str> = figure
            .nodes()
            .iter()
            .filter(|n| n.rank == Some(rank))
            .map(|n| n.id.as_str())
            .collect();
        if ids.is_empty() {
            continue;
        }
        write!(dot, "{{ rank={};", name)?;
        for id in ids {
            write!(dot, " {};", quote(id))?;
        }
        writeln!(dot, " }}")?;
    }

    for edge in figure.edges() {
        write_edge(&mut dot, edge)?;
    }

    writeln!(dot, "}}")?;
    Ok(dot)
}

fn write_node(dot: &mut String, node: &FigureNode) -> std::fmt::Result {
    let label = if node.html {
        format!("<{}>", node.label)
    } else if node.bold {
        format!("<<B>{}</B>>", escape_html(&node.label))
    } else {
        quote(&node.label)
    };
    write!(dot, "{} [label={}", quote(&node.id), label)?;

    match &node.image {
        Some(image) => {
            let image = image.to_string_lossy();
            write!(dot, ", shape=none, image={}, labelloc=b", quote(&image))?;
        }
        None => write!(dot, ", shape={}", node.shape)?,
    }
    if let Some(fill) = node.fill {
        write!(dot, ", style=filled, fillcolor={}", quote(fill))?;
    }
    if let Some(border) = node.border {
        write!(dot, ", color={}", quote(border))?;
    }
    if let Some(font_color) = node.font_color {
        write!(dot, ", fontcolor={}", quote(font_color))?;
    }
    writeln!(dot, "];")
}

fn write_edge(dot: &mut String, edge: &FigureEdge) -> std::fmt::Result {
    write!(dot, "{} -> {} [style={}", quote(&edge.from), quote(&edge.to), edge.style)?;
    if let Some(color) = edge.color {
        write!(dot, ", color={}", quote(color))?;
    }
    if let Some(width) = edge.width {
        write!(dot, ", penwidth={}", width)?;
    }
    writeln!(dot, "];")
}

/// Quotes a DOT identifier.
pub(crate) fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use test_log::test;

    use super::*;

    fn sample() -> Figure {
        let mut figure = Figure::new("sample");
        let mut root = FigureNode::new("r", "Root", "box");
        root.bold = true;
        root.font_color = Some("#4d4d4d");
        figure.add_node(root);
        let mut leaf = FigureNode::new("l", "Leaf", "circle");
        leaf.fill = Some("#ff0000");
        leaf.rank = Some(Rank::Sink);
        figure.add_node(leaf);
        let mut edge = FigureEdge::new("r", "l");
        edge.style = "dashed";
        edge.color = Some("#008000");
        edge.width = Some(3.0);
        figure.add_edge(edge);
        figure
    }

    #[test]
    fn test_to_dot_basic() {
        let dot = to_dot(&sample(), &RenderOptions::default()).unwrap();
        assert!(dot.starts_with("digraph \"sample\" {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("graph [size=\"10,10\"];"));
        assert!(dot.contains("node [fontsize=13];"));
        assert!(dot.contains("\"r\" [label=<<B>Root</B>>, shape=box, fontcolor=\"#4d4d4d\"];"));
        assert!(dot.contains("\"l\" [label=\"Leaf\", shape=circle, style=filled, fillcolor=\"#ff0000\"];"));
        assert!(dot.contains("{ rank=sink; \"l\"; }"));
        assert!(dot.contains("\"r\" -> \"l\" [style=dashed, color=\"#008000\", penwidth=3];"));
    }

    #[test]
    fn test_to_dot_options() {
        let options = RenderOptions {
            dpi: Some(150),
            size: (4.5, 3.0),
            font_size: 9.0,
            ..RenderOptions::default()
        };
        let dot = to_dot(&sample(), &options).unwrap();
        assert!(dot.contains("graph [size=\"4.5,3\", dpi=150];"));
        assert!(dot.contains("node [fontsize=9];"));
    }

    #[test]
    fn test_to_dot_image() {
        let mut figure = Figure::new("img");
        let mut node = FigureNode::new("g", "G", "box");
        node.image = Some(PathBuf::from("/img/andgate.png"));
        figure.add_node(node);
        let dot = to_dot(&figure, &RenderOptions::default()).unwrap();
        assert!(dot.contains("shape=none, image=\"/img/andgate.png\", labelloc=b"));
    }

    #[test]
    fn test_to_dot_html_label() {
        let mut figure = Figure::new("html");
        let mut node = FigureNode::new("t", "<TABLE><TR><TD>a &amp; b</TD></TR></TABLE>", "none");
        node.html = true;
        figure.add_node(node);
        let dot = to_dot(&figure, &RenderOptions::default()).unwrap();
        assert!(dot.contains("\"t\" [label=<<TABLE><TR><TD>a &amp; b</TD></TR></TABLE>>, shape=none];"));
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a \"b\""), "\"a \\\"b\\\"\"");
        assert_eq!(quote("back\\slash"), "\"back\\\\slash\"");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("A & <B>"), "A &amp; &lt;B&gt;");
    }
}
