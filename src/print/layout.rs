//! Node positions computed by a layout engine.
//!
//! The layout is read from Graphviz "plain" output:
//!
//! ```text
//! graph scale width height
//! node name x y width height label style shape color fillcolor
//! edge tail head n x1 y1 .. xn yn [label xl yl] style color
//! stop
//! ```
//!
//! Coordinates are in inches with the origin at the bottom left.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct NodePosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRoute {
    pub from: String,
    pub to: String,
    /// B-spline control points.
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub scale: f64,
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodePosition>,
    pub edges: Vec<EdgeRoute>,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&NodePosition> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn parse(plain: &str) -> Result<Self> {
        let mut layout = Layout::default();
        let mut seen_graph = false;

        for (i, line) in plain.lines().enumerate() {
            let line_no = i + 1;
            let tokens = tokenize(line).map_err(|message| layout_error(line_no, message))?;
            let mut tokens = Tokens {
                line: line_no,
                inner: tokens.into_iter(),
            };
            match tokens.next_str() {
                Err(_) => continue,
                Ok(keyword) => match keyword.as_str() {
                    "graph" => {
                        layout.scale = tokens.next_f64()?;
                        layout.width = tokens.next_f64()?;
                        layout.height = tokens.next_f64()?;
                        seen_graph = true;
                    }
                    "node" => {
                        let id = tokens.next_str()?;
                        let x = tokens.next_f64()?;
                        let y = tokens.next_f64()?;
                        let width = tokens.next_f64()?;
                        let height = tokens.next_f64()?;
                        layout.nodes.push(NodePosition {
                            id,
                            x,
                            y,
                            width,
                            height,
                        });
                    }
                    "edge" => {
                        let from = tokens.next_str()?;
                        let to = tokens.next_str()?;
                        let n = tokens.next_count()?;
                        if n.checked_mul(2).map_or(true, |needed| needed > tokens.remaining()) {
                            return Err(layout_error(line_no, format!("edge has fewer than {} points", n)));
                        }
                        let mut points = Vec::with_capacity(n);
                        for _ in 0..n {
                            let x = tokens.next_f64()?;
                            let y = tokens.next_f64()?;
                            points.push((x, y));
                        }
                        layout.edges.push(EdgeRoute { from, to, points });
                    }
                    "stop" => break,
                    other => return Err(layout_error(line_no, format!("unexpected statement `{}`", other))),
                },
            }
        }

        if !seen_graph {
            return Err(layout_error(0, "missing `graph` statement".to_string()));
        }
        Ok(layout)
    }
}

fn layout_error(line: usize, message: String) -> Error {
    Error::LayoutParse { line, message }
}

struct Tokens {
    line: usize,
    inner: std::vec::IntoIter<String>,
}

impl Tokens {
    fn next_str(&mut self) -> Result<String> {
        self.inner
            .next()
            .ok_or_else(|| layout_error(self.line, "unexpected end of line".to_string()))
    }

    fn remaining(&self) -> usize {
        self.inner.len()
    }

    fn next_count(&mut self) -> Result<usize> {
        let token = self.next_str()?;
        token
            .parse()
            .map_err(|_| layout_error(self.line, format!("expected a count, found `{}`", token)))
    }

    fn next_f64(&mut self) -> Result<f64> {
        let token = self.next_str()?;
        token
            .parse()
            .map_err(|_| layout_error(self.line, format!("expected a number, found `{}`", token)))
    }
}

/// Splits a line into words, honouring `"quoted strings"` and `<html labels>`.
fn tokenize(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut token = String::new();
        match c {
            '"' => {
                chars.next();
                loop {
                    match chars.next() {
                        Some('\\') => match chars.next() {
                            Some(escaped) => token.push(escaped),
                            None => return Err("unterminated string".to_string()),
                        },
                        Some('"') => break,
                        Some(c) => token.push(c),
                        None => return Err("unterminated string".to_string()),
                    }
                }
            }
            '<' => {
                let mut depth = 0usize;
                for c in chars.by_ref() {
                    match c {
                        '<' => depth += 1,
                        '>' => depth -= 1,
                        _ => {}
                    }
                    token.push(c);
                    if depth == 0 {
                        break;
                    }
                }
                if depth != 0 {
                    return Err("unterminated HTML label".to_string());
                }
            }
            _ => {
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    token.push(c);
                    chars.next();
                }
            }
        }
        tokens.push(token);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    const PLAIN: &str = "\
graph 1 1.5 2.5
node \"g0\" 0.75 2.25 0.75 0.5 <<B>SYSTEM</B>> solid box black lightgrey
node \"g1\" 0.375 0.25 0.5 0.5 \"pump \\\"A\\\"\" filled circle black \"#ff0000\"
node g2 1.125 0.25 0.5 0.5 valve filled circle black \"#008000\"
edge \"g0\" \"g1\" 4 0.6 2 0.5 1.5 0.4 0.9 0.375 0.5 solid \"#ff0000\"
edge g0 g2 4 0.9 2 1 1.5 1.1 0.9 1.125 0.5 solid \"#008000\"
stop
";

    #[test]
    fn test_parse_plain() {
        let layout = Layout::parse(PLAIN).unwrap();
        assert_eq!(layout.scale, 1.0);
        assert_eq!(layout.width, 1.5);
        assert_eq!(layout.height, 2.5);
        assert_eq!(layout.nodes.len(), 3);
        assert_eq!(layout.edges.len(), 2);

        let top = layout.node("g0").unwrap();
        assert_eq!((top.x, top.y), (0.75, 2.25));
        assert!(layout.node("g2").is_some());
        assert!(layout.node("g3").is_none());

        let edge = &layout.edges[0];
        assert_eq!((edge.from.as_str(), edge.to.as_str()), ("g0", "g1"));
        assert_eq!(edge.points.len(), 4);
        assert_eq!(edge.points[3], (0.375, 0.5));
    }

    #[test]
    fn test_parse_missing_graph() {
        let result = Layout::parse("node a 1 1 1 1 a solid box black white\nstop\n");
        assert!(matches!(result, Err(Error::LayoutParse { .. })));
    }

    #[test]
    fn test_parse_bad_number() {
        let result = Layout::parse("graph 1 x 2\n");
        assert!(matches!(result, Err(Error::LayoutParse { line: 1, .. })));
    }

    #[test]
    fn test_parse_bad_point_count() {
        for count in ["1e18", "-1", "2.5", "18446744073709551615", "3"] {
            let plain = format!("graph 1 1 1\nedge a b {} 0 0 1 1 solid black\nstop\n", count);
            let result = Layout::parse(&plain);
            assert!(matches!(result, Err(Error::LayoutParse { line: 2, .. })), "{}: {:?}", count, result);
        }
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("a \"b c\" <<B>d e</B>>").unwrap(), ["a", "b c", "<<B>d e</B>>"]);
        assert!(tokenize("\"open").is_err());
    }
}
