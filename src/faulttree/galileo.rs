//! Reader for fault trees in the Galileo (`.dft`) format.
//!
//! ```text
//! toplevel "System";
//! "System" or "Pumps" "Valve";
//! "Pumps" 2of3 "P1" "P2" "P3";
//! "P1" prob=0.01;
//! "P2" prob=1/100;
//! "P3" prob=0.01;
//! "Valve" prob=0.001 dorm=0;
//! ```
//!
//! Supported gates are `and`, `or` and `KofN` voting gates. Every other line
//! declares a basic event with optional `key=value` attributes, of which only
//! `prob` is used.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::faulttree::{parse_probability, FaultTree, FaultTreeBuilder, GateKind};
use crate::types::GateId;

/// Reads a fault tree from a file, choosing the reader by extension.
///
/// Only Galileo files (`.dft`) are supported.
pub fn read_file(path: impl AsRef<Path>) -> Result<FaultTree> {
    let path = path.as_ref();
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if !extension.eq_ignore_ascii_case("dft") {
        return Err(Error::UnsupportedFileType {
            extension: extension.to_string(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    let tree = parse(&contents)?;
    info!(
        "Read fault tree {:?} from {}: {} gates, {} basic events",
        tree.name(),
        path.display(),
        tree.num_gates(),
        tree.num_events()
    );
    Ok(tree)
}

#[derive(Debug)]
enum Definition {
    Gate { kind: GateKind, inputs: Vec<String> },
    Event { probability: f64 },
}

#[derive(Debug, Copy, Clone)]
enum Mark {
    InProgress,
    Done(GateId),
}

/// Parses the contents of a Galileo file.
///
/// The tree is named after its top-level gate.
pub fn parse(contents: &str) -> Result<FaultTree> {
    let mut toplevel: Option<(String, usize)> = None;
    let mut definitions: Vec<(String, Definition, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (i, raw) in contents.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        let args: Vec<&str> = trimmed.trim_end_matches(';').split_whitespace().collect();
        if args.is_empty() {
            continue;
        }

        if args[0] == "toplevel" {
            if toplevel.is_some() {
                return Err(galileo_error(line, "toplevel is defined twice"));
            }
            let name = args.get(1).ok_or_else(|| galileo_error(line, "toplevel without a name"))?;
            toplevel = Some((read_name(name, line)?, line));
            continue;
        }

        let name = read_name(args[0], line)?;
        let definition = match args.get(1) {
            Some(word) if !word.contains('=') => {
                let kind = gate_kind(word, args.len() - 2).ok_or_else(|| {
                    galileo_error(line, format!("no suitable gate found for {:?}", word))
                })?;
                let inputs = args[2..].iter().map(|w| read_name(w, line)).collect::<Result<Vec<_>>>()?;
                Definition::Gate { kind, inputs }
            }
            _ => Definition::Event {
                probability: parse_event_attributes(&name, &args[1..], line)?,
            },
        };
        if index.insert(name.clone(), definitions.len()).is_some() {
            return Err(galileo_error(line, format!("{:?} is defined twice", name)));
        }
        definitions.push((name, definition, line));
    }

    let (top_name, top_line) = toplevel.ok_or_else(|| galileo_error(0, "toplevel is not defined"))?;

    let mut builder = FaultTreeBuilder::new();
    let mut marks: Vec<Option<Mark>> = vec![None; definitions.len()];

    // Basic events are created up front so that event ids follow the file order.
    for (i, (name, definition, _)) in definitions.iter().enumerate() {
        if let Definition::Event { probability } = definition {
            let id = builder.basic_event_with(name, false, *probability)?;
            marks[i] = Some(Mark::Done(id));
        }
    }

    let mut resolver = Resolver {
        definitions: &definitions,
        index: &index,
        marks,
        builder,
    };
    let top = resolver.resolve(&top_name, top_line)?;

    let unused = resolver.marks.iter().filter(|m| m.is_none()).count();
    if unused > 0 {
        debug!("{} gates are not reachable from {:?} and were skipped", unused, top_name);
    }

    resolver.builder.build(&top_name, top)
}

struct Resolver<'a> {
    definitions: &'a [(String, Definition, usize)],
    index: &'a HashMap<String, usize>,
    marks: Vec<Option<Mark>>,
    builder: FaultTreeBuilder,
}

impl Resolver<'_> {
    /// Creates the named gate after all of its inputs.
    fn resolve(&mut self, name: &str, referenced_at: usize) -> Result<GateId> {
        let &i = self
            .index
            .get(name)
            .ok_or_else(|| galileo_error(referenced_at, format!("missing definition for gate {:?}", name)))?;
        let definitions = self.definitions;
        let (_, definition, line) = &definitions[i];
        match self.marks[i] {
            Some(Mark::Done(id)) => return Ok(id),
            Some(Mark::InProgress) => {
                return Err(galileo_error(*line, format!("gate {:?} is part of a cycle", name)));
            }
            None => {}
        }
        let Definition::Gate { kind, inputs } = definition else {
            unreachable!("basic events are created before resolution");
        };
        self.marks[i] = Some(Mark::InProgress);
        let mut ids = Vec::with_capacity(inputs.len());
        for input in inputs {
            ids.push(self.resolve(input, *line)?);
        }
        let id = self
            .builder
            .gate(name, *kind, ids)
            .map_err(|e| galileo_error(*line, e.to_string()))?;
        self.marks[i] = Some(Mark::Done(id));
        Ok(id)
    }
}

/// Maps a Galileo gate keyword to a gate kind.
fn gate_kind(word: &str, num_inputs: usize) -> Option<GateKind> {
    match word {
        "and" => Some(GateKind::And),
        "or" => Some(GateKind::Or),
        _ => {
            let (k, n) = word.split_once("of")?;
            let k: usize = k.parse().ok()?;
            let n: usize = n.parse().ok()?;
            if n != num_inputs {
                warn!("voting gate {:?} declares {} inputs but lists {}", word, n, num_inputs);
            }
            Some(GateKind::Vot { threshold: k })
        }
    }
}

fn parse_event_attributes(name: &str, args: &[&str], line: usize) -> Result<f64> {
    let mut probability = 0.0;
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| galileo_error(line, format!("expected key=value, got {:?}", arg)))?;
        match key {
            "prob" => {
                probability = parse_probability(value).map_err(|e| galileo_error(line, e.to_string()))?;
            }
            _ => warn!("ignoring attribute {:?} of basic event {:?}", key, name),
        }
    }
    Ok(probability)
}

/// Reads a possibly quoted name: `"foo"` and `foo` both give `foo`.
fn read_name(word: &str, line: usize) -> Result<String> {
    match word.strip_prefix('"') {
        Some(rest) => match rest.strip_suffix('"') {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(galileo_error(line, format!("invalid name {}", word))),
        },
        None => Ok(word.to_string()),
    }
}

fn galileo_error(line: usize, message: impl Into<String>) -> Error {
    Error::Galileo {
        line,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    const PUMPS: &str = r#"
toplevel "System";
"System" or "Pumps" "Valve";
"Pumps" 2of3 "P1" "P2" "P3";
"P1" prob=0.01;
"P2" prob=1/100;
"P3" prob=0.01;
"Valve" prob=0.001 dorm=0;
"#;

    #[test]
    fn test_parse_pumps() {
        let tree = parse(PUMPS).unwrap();
        assert_eq!(tree.name(), "System");
        assert_eq!(tree.num_events(), 4);
        assert_eq!(tree.num_gates(), 6);

        let pumps = tree.find("Pumps").unwrap();
        assert_eq!(tree.gate(pumps).kind(), GateKind::Vot { threshold: 2 });
        assert_eq!(tree.gate(pumps).label(), "Pumps (2/3)");

        let p2 = tree.event("P2").unwrap();
        assert_eq!(tree.basic_event(p2).probability, 0.01);
    }

    #[test]
    fn test_event_ids_follow_file_order() {
        let tree = parse(PUMPS).unwrap();
        let names: Vec<&str> = tree.events().map(|(e, _)| tree.event_name(e)).collect();
        assert_eq!(names, vec!["P1", "P2", "P3", "Valve"]);
    }

    #[test]
    fn test_parse_evaluates() {
        let mut tree = parse(PUMPS).unwrap();
        tree.set_states([("P1", true), ("P3", true)]);
        assert!(tree.apply());
        tree.set_state("P3", false);
        assert!(!tree.apply());
    }

    #[test]
    fn test_unquoted_names() {
        let tree = parse("toplevel T;\nT and a b;\na;\nb prob=0.5;\n").unwrap();
        assert_eq!(tree.num_events(), 2);
        assert_eq!(tree.gate(tree.top()).kind(), GateKind::And);
    }

    #[test]
    fn test_missing_toplevel() {
        let err = parse("\"A\" or \"B\";\n\"B\";\n").unwrap_err();
        assert!(matches!(err, Error::Galileo { .. }));
    }

    #[test]
    fn test_toplevel_twice() {
        let err = parse("toplevel \"A\";\ntoplevel \"B\";\n").unwrap_err();
        assert!(matches!(err, Error::Galileo { line: 2, .. }));
    }

    #[test]
    fn test_missing_definition() {
        let err = parse("toplevel \"A\";\n\"A\" or \"B\" \"C\";\n\"B\";\n").unwrap_err();
        match err {
            Error::Galileo { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("\"C\""));
            }
            e => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn test_cycle() {
        let err = parse("toplevel A;\nA or B;\nB and A c;\nc;\n").unwrap_err();
        assert!(matches!(err, Error::Galileo { .. }));
    }

    #[test]
    fn test_unknown_gate() {
        let err = parse("toplevel A;\nA pand b c;\nb;\nc;\n").unwrap_err();
        assert!(matches!(err, Error::Galileo { line: 2, .. }));
    }

    #[test]
    fn test_invalid_name() {
        assert!(parse("toplevel \"\";\n").is_err());
        assert!(parse("toplevel \"A;\n").is_err());
    }

    #[test]
    fn test_invalid_probability() {
        let err = parse("toplevel A;\nA or b;\nb prob=1.5;\n").unwrap_err();
        assert!(matches!(err, Error::Galileo { line: 3, .. }));
    }

    #[test]
    fn test_read_file_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.txt");
        std::fs::write(&path, PUMPS).unwrap();
        assert!(matches!(read_file(&path), Err(Error::UnsupportedFileType { .. })));

        let path = dir.path().join("tree.dft");
        std::fs::write(&path, PUMPS).unwrap();
        let tree = read_file(&path).unwrap();
        assert_eq!(tree.name(), "System");
    }
}
