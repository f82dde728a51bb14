use flame_layout::aggregator::{build_tree, build_tree_from_samples, expand_folded, fold_stacks, CallTree, NodePath};
use flame_layout::flamegraph::{compute_layout, diff_trees, search, zoomed_layout, LayoutConfig, PositionedNode, ZoomState};
use flame_layout::parser::{parse_collapsed, parse_input, parse_sample_tree};
use flame_layout::samples::{realistic_profile, request_stacks};
use flame_layout::utils::error::MalformedTreeError;
use pretty_assertions::assert_eq;

const EPS: f64 = 1e-9;

fn request_tree() -> CallTree {
    build_tree(&fold_stacks(&request_stacks())).unwrap()
}

fn realistic_tree() -> CallTree {
    build_tree_from_samples(&realistic_profile()).unwrap()
}

fn node<'a>(nodes: &'a [PositionedNode], path: &str) -> &'a PositionedNode {
    nodes
        .iter()
        .find(|n| n.path.as_str() == path)
        .unwrap_or_else(|| panic!("no node at {}", path))
}

#[test]
fn test_request_samples_fold_and_build() {
    let folded = fold_stacks(&request_stacks());
    let counts: Vec<(&str, u64)> = folded.iter().map(|f| (f.stack.as_str(), f.count)).collect();

    assert_eq!(
        counts,
        vec![
            ("main;handleRequest;processData;parseJSON", 4),
            ("main;handleRequest;processData;validate", 2),
            ("main;handleRequest;log", 1),
            ("main;handleRequest;processData;transform", 1),
        ]
    );

    let tree = build_tree(&folded).unwrap();
    assert!(!tree.has_implicit_root());
    assert_eq!(tree.total_value(), 8);

    let handle = tree.find(&NodePath::from("main;handleRequest")).unwrap();
    assert_eq!(handle.total_value, 8);
    assert_eq!(handle.self_value, 0);

    let process = tree.find(&NodePath::from("main;handleRequest;processData")).unwrap();
    assert_eq!(process.total_value, 7);
}

#[test]
fn test_request_tree_self_values() {
    let tree = request_tree();
    let self_value = |path: &str| tree.find(&NodePath::from(path)).unwrap().self_value;

    assert_eq!(self_value("main;handleRequest;processData;parseJSON"), 4);
    assert_eq!(self_value("main;handleRequest;processData;validate"), 2);
    assert_eq!(self_value("main;handleRequest;processData;transform"), 1);
    assert_eq!(self_value("main;handleRequest;log"), 1);
    assert_eq!(self_value("main;handleRequest;processData"), 0);
    assert_eq!(self_value("main"), 0);
}

#[test]
fn test_every_node_conserves_value() {
    for tree in [request_tree(), realistic_tree()] {
        for (path, entry) in tree.walk() {
            let node = entry.node;
            let children = node.children_total().unwrap();
            assert_eq!(node.total_value, node.self_value + children, "at {}", path);
        }
    }
}

#[test]
fn test_request_layout_positions() {
    let nodes = compute_layout(&request_tree(), &LayoutConfig::new()).unwrap();

    let log = node(&nodes, "main;handleRequest;log");
    let process = node(&nodes, "main;handleRequest;processData");
    assert!(log.x1 <= process.x0 + EPS, "log must sit left of processData");
    assert!((log.width() - 0.125).abs() < EPS);

    let parse = node(&nodes, "main;handleRequest;processData;parseJSON");
    assert!((parse.width() - 0.5).abs() < EPS);
    assert_eq!(parse.depth, 3);
}

#[test]
fn test_fold_is_idempotent() {
    let once = fold_stacks(&request_stacks());
    let twice = fold_stacks(&expand_folded(&once));
    assert_eq!(once, twice);
}

#[test]
fn test_tree_folds_back_to_its_input() {
    let folded = parse_collapsed("a;b 3\na;c 1\na;b 2\na 4\n").unwrap();
    let tree = build_tree(&folded).unwrap();
    assert_eq!(tree.to_folded(), folded);
}

#[test]
fn test_layout_conserves_width() {
    let tree = realistic_tree();
    let width = 1200.0;
    let nodes = compute_layout(&tree, &LayoutConfig::new().with_width(width)).unwrap();

    let root = &nodes[0];
    assert_eq!(root.x0, 0.0);
    assert_eq!(root.x1, width);

    for parent in &nodes {
        let mut children: Vec<&PositionedNode> = nodes
            .iter()
            .filter(|n| n.depth == parent.depth + 1 && parent.path.contains(&n.path))
            .collect();
        if children.is_empty() {
            continue;
        }
        children.sort_by(|a, b| a.x0.total_cmp(&b.x0));

        // Contiguous, left-aligned and alphabetical
        assert!((children[0].x0 - parent.x0).abs() < 1e-6);
        for pair in children.windows(2) {
            assert!((pair[0].x1 - pair[1].x0).abs() < 1e-6);
            assert!(pair[0].name < pair[1].name);
        }

        let self_width = parent.self_value as f64 / tree.total_value() as f64 * width;
        let used: f64 = children.iter().map(|c| c.width()).sum();
        assert!((used + self_width - parent.width()).abs() < 1e-6, "at {}", parent.path);
    }
}

#[test]
fn test_zoom_stretches_subtree() {
    let tree = realistic_tree();
    let config = LayoutConfig::new().with_width(100.0);
    let full = compute_layout(&tree, &config).unwrap();

    let mut zoom = ZoomState::new(&tree);
    assert!(zoom.zoom_in(&tree, &NodePath::from("main;handleRequest")));
    let zoomed = zoomed_layout(&tree, &zoom, &config).unwrap();

    let active = node(&zoomed, "main;handleRequest");
    assert_eq!(active.x0, 0.0);
    assert_eq!(active.x1, 100.0);
    assert_eq!(active.depth, 0);
    assert!(zoomed.iter().all(|n| n.path.as_str().starts_with("main;handleRequest")));

    let query = node(&zoomed, "main;handleRequest;queryDatabase");
    assert!((query.width() - 100.0 * 380.0 / 820.0).abs() < 1e-6);
    assert_eq!(query.depth, 1);

    // Width ratios between any two visible nodes are preserved
    let full_exec = node(&full, "main;handleRequest;queryDatabase;executeQuery");
    let full_auth = node(&full, "main;handleRequest;authenticate");
    let zoom_exec = node(&zoomed, "main;handleRequest;queryDatabase;executeQuery");
    let zoom_auth = node(&zoomed, "main;handleRequest;authenticate");
    let before = full_exec.width() / full_auth.width();
    let after = zoom_exec.width() / zoom_auth.width();
    assert!((before - after).abs() < 1e-9);
}

#[test]
fn test_zoom_breadcrumbs_and_zoom_out() {
    let tree = realistic_tree();
    let mut zoom = ZoomState::new(&tree);

    assert!(zoom.zoom_in(&tree, &NodePath::from("main;handleRequest;queryDatabase")));
    assert_eq!(
        zoom.breadcrumbs(),
        vec![
            NodePath::from("main"),
            NodePath::from("main;handleRequest"),
            NodePath::from("main;handleRequest;queryDatabase"),
        ]
    );

    // Leaves cannot become the active root
    assert!(!zoom.zoom_in(&tree, &NodePath::from("main;handleRequest;queryDatabase;executeQuery")));

    assert_eq!(zoom.depth(), 2);

    zoom.zoom_out(1);
    assert_eq!(zoom.active_root(), &NodePath::from("main;handleRequest"));

    // Out-of-range indexes are clamped
    zoom.zoom_out(10);
    assert_eq!(zoom.len(), 2);

    zoom.reset_zoom();
    assert!(!zoom.is_zoomed());
    assert_eq!(zoom.active_root(), &NodePath::from("main"));
}

#[test]
fn test_search_finds_every_position() {
    let tree = realistic_tree();
    let result = search(&tree, "  FormatLog ");
    let stats = result.stats.clone().unwrap();

    assert_eq!(result.matches.len(), 7);
    assert_eq!(stats.count, 7);
    assert_eq!(stats.self_value, 115);
    assert_eq!(stats.percentage_label(), "11.5");

    let expected: Vec<NodePath> = tree
        .walk()
        .into_iter()
        .filter(|(_, entry)| entry.node.name == "formatLog")
        .map(|(path, _)| path)
        .collect();
    assert!(expected.iter().all(|p| result.is_match(p)));
}

#[test]
fn test_search_without_matches_or_query() {
    let tree = request_tree();

    let none = search(&tree, "nothing-here");
    assert!(none.matches.is_empty());
    assert_eq!(none.stats.unwrap().count, 0);

    let blank = search(&tree, "   ");
    assert!(blank.stats.is_none());
}

#[test]
fn test_disagreeing_roots_get_implicit_root() {
    let tree = build_tree(&fold_stacks(&[vec!["a", "x"], vec!["b", "y"]])).unwrap();

    assert!(tree.has_implicit_root());
    assert_eq!(tree.root().name, "root");
    assert_eq!(tree.total_value(), 2);
    assert_eq!(tree.root().children.len(), 2);
}

#[test]
fn test_malformed_sample_tree_is_rejected() {
    let sample = parse_sample_tree(
        r#"{"name": "main", "value": 5, "children": [
            {"name": "a", "value": 4},
            {"name": "b", "value": 3}
        ]}"#,
    )
    .unwrap();

    let err = build_tree_from_samples(&sample).unwrap_err();
    assert!(matches!(err, MalformedTreeError::TotalBelowParts { .. }));
    assert_eq!(err.path(), "main");
}

#[test]
fn test_parse_input_detects_format() {
    let tree = parse_input("main;a 2\nmain;b 1\n").unwrap().into_tree().unwrap();
    assert_eq!(tree.total_value(), 3);

    let json = r#"{"name": "main", "value": 3, "selfValue": 1, "children": [{"name": "a", "value": 2, "selfValue": 2}]}"#;
    let tree = parse_input(json).unwrap().into_tree().unwrap();
    assert_eq!(tree.root().self_value, 1);
}

#[test]
fn test_diff_pairs_frames_by_path() {
    let before = build_tree(&parse_collapsed("main;a 2\nmain;b 2\n").unwrap()).unwrap();
    let after = build_tree(&parse_collapsed("main;a 3\nmain;c 1\n").unwrap()).unwrap();

    let deltas = diff_trees(&before, &after);
    let paths: Vec<&str> = deltas.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, vec!["main", "main;a", "main;b", "main;c"]);

    assert_eq!(deltas[1].delta, Some(0.5));
    assert!(deltas[2].is_removed());
    assert!(deltas[3].is_new());
}
