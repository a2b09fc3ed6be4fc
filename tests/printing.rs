use std::path::Path;

use test_log::test;

use ftbdd::bdd::construct::BddConstructor;
use ftbdd::error::Error;
use ftbdd::faulttree::{galileo, FaultTree, FaultTreeBuilder};
use ftbdd::ordering::{BfsOrdering, ManualOrdering};
use ftbdd::print::graphviz;
use ftbdd::print::{BddPrinter, FaultTreePrinter, PrettyPrint, RenderOptions};

const PUMPS: &str = r#"
// Two redundant pumps feeding one valve.
toplevel "System";
"System" or "Pumps" "Valve";
"Pumps" and "P1" "P2";
"P1" prob=0.1;
"P2" prob=0.1;
"Valve" prob=1/100;
"#;

fn root_with_two_leaves() -> FaultTree {
    let mut b = FaultTreeBuilder::new();
    let x = b.basic_event("x").unwrap();
    let y = b.basic_event("y").unwrap();
    let top = b.or("top", [x, y]).unwrap();
    b.build("small", top).unwrap()
}

fn count(dot: &str, needle: &str) -> usize {
    dot.lines().filter(|line| line.contains(needle)).count()
}

fn have_dot() -> bool {
    let available = graphviz::is_available("dot");
    if !available {
        log::warn!("Graphviz `dot` not found, skipping");
    }
    available
}

#[test]
fn root_with_two_leaves_to_file() {
    let tree = root_with_two_leaves();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.dot");

    FaultTreePrinter::new(&tree)
        .print_to_file(&path, &RenderOptions::default())
        .unwrap();

    let dot = std::fs::read_to_string(&path).unwrap();
    assert_eq!(count(&dot, "[label="), 3);
    assert_eq!(count(&dot, " -> "), 2);
}

#[test]
fn galileo_tree_to_file() {
    let tree = galileo::parse(PUMPS).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pumps.gv");

    FaultTreePrinter::new(&tree)
        .print_to_file(&path, &RenderOptions::default())
        .unwrap();

    let dot = std::fs::read_to_string(&path).unwrap();
    assert!(!dot.is_empty());
    assert_eq!(count(&dot, "[label="), 5);
    assert_eq!(count(&dot, " -> "), 4);
}

#[test]
fn bdd_to_file() {
    let tree = galileo::parse(PUMPS).unwrap();
    let ordering = ManualOrdering::new(["Valve", "P1", "P2"]);
    let bdd = BddConstructor::new(&tree).construct(&ordering, true).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pumps-bdd.dot");

    BddPrinter::new(&bdd).print_to_file(&path, &RenderOptions::default()).unwrap();

    let dot = std::fs::read_to_string(&path).unwrap();
    // Valve, P1, P2 and both leaves.
    assert_eq!(count(&dot, "[label="), 5);
    assert_eq!(count(&dot, " -> "), 6);
    assert_eq!(count(&dot, "style=dashed"), 3);
}

#[test]
fn prepare_is_deterministic() {
    let tree = galileo::parse(PUMPS).unwrap();
    let bdd = BddConstructor::new(&tree)
        .construct(&BfsOrdering::default(), false)
        .unwrap();

    let options = RenderOptions::default();
    let tree_printer = FaultTreePrinter::new(&tree);
    assert_eq!(tree_printer.to_dot(&options).unwrap(), tree_printer.to_dot(&options).unwrap());
    let bdd_printer = BddPrinter::new(&bdd);
    assert_eq!(bdd_printer.to_dot(&options).unwrap(), bdd_printer.to_dot(&options).unwrap());
}

#[test]
fn unwritable_path() {
    let tree = root_with_two_leaves();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no").join("such").join("dir").join("small.dot");

    let result = FaultTreePrinter::new(&tree).print_to_file(&path, &RenderOptions::default());
    assert!(result.is_err());
    assert!(!path.exists());
}

#[test]
fn existing_file_untouched_on_failure() {
    let tree = root_with_two_leaves();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.svg");
    std::fs::write(&path, "old").unwrap();

    let options = RenderOptions {
        engine: "no-such-graphviz-engine".to_string(),
        ..RenderOptions::default()
    };
    let result = FaultTreePrinter::new(&tree).print_to_file(&path, &options);
    assert!(matches!(result, Err(Error::EngineNotFound { .. })));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
}

#[test]
#[cfg(unix)]
fn large_tree_with_failing_engine() {
    let mut b = FaultTreeBuilder::new();
    let events: Vec<_> = (0..3000)
        .map(|i| b.basic_event(&format!("event {}", i)).unwrap())
        .collect();
    let top = b.or("top", events).unwrap();
    let tree = b.build("large", top).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large.svg");
    // `false` exits without reading the DOT it is given.
    let options = RenderOptions {
        engine: "false".to_string(),
        ..RenderOptions::default()
    };
    let result = FaultTreePrinter::new(&tree).print_to_file(&path, &options);
    assert!(matches!(result, Err(Error::Engine { .. })), "{:?}", result);
    assert!(!path.exists());
}

#[test]
fn window_without_display() {
    let has_display = ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|key| std::env::var_os(key).is_some_and(|v| !v.is_empty()));
    if has_display || cfg!(any(windows, target_os = "macos")) {
        return;
    }

    let tree = root_with_two_leaves();
    let result = FaultTreePrinter::new(&tree).print_to_window(&RenderOptions::default());
    assert!(matches!(result, Err(Error::NoDisplay { .. })));
}

#[test]
fn render_svg() {
    if !have_dot() {
        return;
    }
    let tree = galileo::parse(PUMPS).unwrap();
    let dir = tempfile::tempdir().unwrap();

    for name in ["pumps.svg", "pumps.png", "pumps.pdf"] {
        let path = dir.path().join(name);
        FaultTreePrinter::new(&tree)
            .print_to_file(&path, &RenderOptions::default())
            .unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0, "{} is empty", name);
    }
}

#[test]
fn layout_places_every_node() {
    if !have_dot() {
        return;
    }
    let tree = root_with_two_leaves();
    let layout = FaultTreePrinter::new(&tree).layout(&RenderOptions::default()).unwrap();
    assert_eq!(layout.nodes.len(), 3);
    assert_eq!(layout.edges.len(), 2);

    // The top event is drawn above its inputs.
    let top = layout.node(&tree.top().to_string()).unwrap();
    for (_, event) in tree.events() {
        let leaf = layout.node(&event.gate.to_string()).unwrap();
        assert!(top.y > leaf.y);
    }
}

#[test]
fn bdd_leaves_at_the_bottom() {
    if !have_dot() {
        return;
    }
    let tree = galileo::parse(PUMPS).unwrap();
    let bdd = BddConstructor::new(&tree)
        .construct(&BfsOrdering::default(), true)
        .unwrap();
    let layout = BddPrinter::new(&bdd).layout(&RenderOptions::default()).unwrap();

    let zero = layout.node("n0").unwrap();
    let one = layout.node("n1").unwrap();
    assert_eq!(zero.y, one.y);
    assert!(layout.nodes.iter().all(|n| n.y >= zero.y));
}

#[test]
fn read_file_rejects_other_extensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pumps.txt");
    std::fs::write(&path, PUMPS).unwrap();
    assert!(matches!(galileo::read_file(&path), Err(Error::UnsupportedFileType { .. })));

    let path = dir.path().join("pumps.dft");
    std::fs::write(&path, PUMPS).unwrap();
    let tree = galileo::read_file(Path::new(&path)).unwrap();
    assert_eq!(tree.num_events(), 3);
}
