//! Zoom state and crop-and-stretch rescaling.
//!
//! Zooming never recomputes proportions against a different total. The full
//! tree is laid out first, then the active root's subtree is cropped and
//! affinely stretched so the active root fills the whole width.

use super::layout::{compute_layout, LayoutConfig, PositionedNode};
use crate::aggregator::call_tree::{CallTree, NodePath};
use crate::utils::error::LayoutError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Zoom path from the true root to the active root
///
/// Owned by the interaction surface and handed to the engine on every
/// render. The true root is always present; each entry is a child of the
/// previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomState {
    root: NodePath,
    zoomed: Vec<NodePath>,
}

impl ZoomState {
    /// Unzoomed state for `tree`
    pub fn new(tree: &CallTree) -> Self {
        Self {
            root: tree.root_path(),
            zoomed: Vec::new(),
        }
    }

    /// Node currently used as the layout root
    pub fn active_root(&self) -> &NodePath {
        self.zoomed.last().unwrap_or(&self.root)
    }

    /// Every entry from the true root to the active root
    pub fn breadcrumbs(&self) -> Vec<NodePath> {
        std::iter::once(&self.root)
            .chain(self.zoomed.iter())
            .cloned()
            .collect()
    }

    /// Number of entries on the stack (at least 1)
    pub fn len(&self) -> usize {
        self.zoomed.len() + 1
    }

    /// Zoom levels below the true root
    pub fn depth(&self) -> usize {
        self.zoomed.len()
    }

    pub fn is_zoomed(&self) -> bool {
        !self.zoomed.is_empty()
    }

    /// Make the node at `path` the active root
    ///
    /// Silently ignored for leaves, zero-valued nodes, unknown paths and the
    /// current active root. Zooming onto a deeper descendant records every
    /// intermediate ancestor, so `zoom_out` can step back one level at a time.
    ///
    /// # Returns
    /// Whether the state changed
    pub fn zoom_in(&mut self, tree: &CallTree, path: &NodePath) -> bool {
        let Some(node) = tree.find(path) else {
            debug!("Ignoring zoom onto unknown node '{}'", path);
            return false;
        };
        if node.is_leaf() || node.total_value == 0 || path == self.active_root() {
            debug!("Ignoring zoom onto '{}'", path);
            return false;
        }

        self.zoomed = path.prefixes().into_iter().skip(1).collect();
        debug!("Zoomed into '{}' (stack depth {})", path, self.len());
        true
    }

    /// Truncate the stack to `to_index + 1` entries
    pub fn zoom_out(&mut self, to_index: usize) {
        self.zoomed.truncate(to_index);
    }

    /// Back to the true root
    pub fn reset_zoom(&mut self) {
        self.zoomed.clear();
    }
}

/// Lay out the active root's subtree, stretched to fill `config.width`
///
/// `scale = width / (zx1 - zx0)` and `offset = zx0` are taken from the
/// unzoomed layout; depths become relative to the active root.
pub fn zoomed_layout(
    tree: &CallTree,
    zoom: &ZoomState,
    config: &LayoutConfig,
) -> Result<Vec<PositionedNode>, LayoutError> {
    let full = compute_layout(tree, config)?;
    if !zoom.is_zoomed() {
        return Ok(full);
    }

    let active = zoom.active_root();
    let Some(anchor) = full.iter().find(|n| &n.path == active) else {
        warn!("Zoom target '{}' is not in this tree, showing full layout", active);
        return Ok(full);
    };

    let span = anchor.x1 - anchor.x0;
    if span <= 0.0 {
        return Ok(Vec::new());
    }

    let offset = anchor.x0;
    let scale = config.width / span;
    let base_depth = anchor.depth;

    let nodes: Vec<PositionedNode> = full
        .into_iter()
        .filter(|n| active.contains(&n.path))
        .map(|mut n| {
            if &n.path == active {
                n.x0 = 0.0;
                n.x1 = config.width;
            } else {
                n.x0 = (n.x0 - offset) * scale;
                n.x1 = (n.x1 - offset) * scale;
            }
            n.depth -= base_depth;
            n
        })
        .collect();

    debug!("Zoomed layout: {} nodes under '{}' (scale {:.3})", nodes.len(), active, scale);
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{build_tree, FoldedStack};

    fn tree() -> CallTree {
        build_tree(&[
            FoldedStack::new("main;a;x", 1),
            FoldedStack::new("main;a;y", 3),
            FoldedStack::new("main;b", 4),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_state_is_unzoomed() {
        let zoom = ZoomState::new(&tree());
        assert_eq!(zoom.len(), 1);
        assert!(!zoom.is_zoomed());
        assert_eq!(zoom.active_root().as_str(), "main");
    }

    #[test]
    fn test_zoom_in_and_out() {
        let tree = tree();
        let mut zoom = ZoomState::new(&tree);

        assert!(zoom.zoom_in(&tree, &NodePath::from("main;a")));
        assert_eq!(zoom.len(), 2);
        assert_eq!(zoom.active_root().as_str(), "main;a");

        zoom.zoom_out(0);
        assert_eq!(zoom.len(), 1);

        zoom.zoom_out(10);
        assert_eq!(zoom.len(), 1);
    }

    #[test]
    fn test_zoom_in_ignores_leaves_and_unknown() {
        let tree = tree();
        let mut zoom = ZoomState::new(&tree);

        assert!(!zoom.zoom_in(&tree, &NodePath::from("main;b")));
        assert!(!zoom.zoom_in(&tree, &NodePath::from("main;missing")));
        assert!(!zoom.zoom_in(&tree, &NodePath::from("main")));
        assert_eq!(zoom.len(), 1);
    }

    #[test]
    fn test_zoom_in_same_node_twice() {
        let tree = tree();
        let mut zoom = ZoomState::new(&tree);
        zoom.zoom_in(&tree, &NodePath::from("main;a"));
        assert!(!zoom.zoom_in(&tree, &NodePath::from("main;a")));
        assert_eq!(zoom.len(), 2);
    }

    #[test]
    fn test_reset_zoom() {
        let tree = tree();
        let mut zoom = ZoomState::new(&tree);
        zoom.zoom_in(&tree, &NodePath::from("main;a"));
        zoom.reset_zoom();
        assert_eq!(zoom.breadcrumbs(), vec![NodePath::from("main")]);
    }

    #[test]
    fn test_zoomed_layout_stretches_subtree() {
        let tree = tree();
        let mut zoom = ZoomState::new(&tree);
        zoom.zoom_in(&tree, &NodePath::from("main;a"));

        let config = LayoutConfig::new().with_width(100.0);
        let nodes = zoomed_layout(&tree, &zoom, &config).unwrap();

        let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "x", "y"]);
        assert_eq!((nodes[0].x0, nodes[0].x1, nodes[0].depth), (0.0, 100.0, 0));
        assert!((nodes[1].x1 - 25.0).abs() < 1e-9);
        assert!((nodes[2].x0 - 25.0).abs() < 1e-9);
        assert!((nodes[2].x1 - 100.0).abs() < 1e-9);
        assert_eq!(nodes[2].depth, 1);
    }

    #[test]
    fn test_zoomed_layout_without_zoom_is_full_layout() {
        let tree = tree();
        let config = LayoutConfig::new();
        assert_eq!(
            zoomed_layout(&tree, &ZoomState::new(&tree), &config).unwrap(),
            compute_layout(&tree, &config).unwrap()
        );
    }
}
