//! Proportional flame graph layout.
//!
//! Every node gets a horizontal interval `[x0, x1)` inside its parent and a
//! depth. Siblings are always placed in lexicographic order of name, so a
//! function keeps its horizontal position across renders and across different
//! sample sets. The x-axis therefore carries no temporal meaning.

use crate::aggregator::call_tree::{CallTree, NodePath, TreeNode};
use crate::utils::config::DEFAULT_LAYOUT_WIDTH;
use crate::utils::error::LayoutError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Layout configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Width budget of the active root (1.0, or a pixel count)
    pub width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_LAYOUT_WIDTH,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.width.is_finite() && self.width > 0.0 {
            Ok(())
        } else {
            Err(LayoutError::InvalidWidth(self.width))
        }
    }
}

/// A render-ready rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub name: String,
    pub total_value: u64,
    pub self_value: u64,
    pub x0: f64,
    pub x1: f64,
    /// Distance from the active root
    pub depth: usize,
    pub path: NodePath,
}

impl PositionedNode {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
}

/// Lay out the whole tree, root at `[0, width)` and depth 0
///
/// Nodes with a zero total are omitted along with their subtree; they take
/// up no width, so their siblings stay contiguous.
///
/// # Returns
/// Positioned nodes in depth-first pre-order
pub fn compute_layout(
    tree: &CallTree,
    config: &LayoutConfig,
) -> Result<Vec<PositionedNode>, LayoutError> {
    config.validate()?;

    let mut nodes = Vec::with_capacity(tree.node_count());
    layout_node(tree.root(), tree.root_path(), 0, 0.0, config.width, &mut nodes);

    debug!(
        "Laid out {} of {} nodes at width {}",
        nodes.len(),
        tree.node_count(),
        config.width
    );
    Ok(nodes)
}

fn layout_node(
    node: &TreeNode,
    path: NodePath,
    depth: usize,
    x0: f64,
    x1: f64,
    out: &mut Vec<PositionedNode>,
) {
    if node.total_value == 0 {
        return;
    }

    let span = x1 - x0;
    let total = node.total_value as f64;

    // Positions come from cumulative totals so rounding does not drift
    // across long sibling lists.
    let mut cumulative = 0u64;
    let placements: Vec<(&TreeNode, f64, f64)> = node
        .sorted_children()
        .map(|child| {
            let start = x0 + span * (cumulative as f64 / total);
            cumulative += child.total_value;
            let end = x0 + span * (cumulative as f64 / total);
            (child, start, end)
        })
        .collect();

    out.push(PositionedNode {
        name: node.name.clone(),
        total_value: node.total_value,
        self_value: node.self_value,
        x0,
        x1,
        depth,
        path: path.clone(),
    });

    for (child, start, end) in placements {
        layout_node(child, path.child(&child.name), depth + 1, start, end, out);
    }
}
