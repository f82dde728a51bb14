//! Frame-by-frame comparison of two independently built trees.
//!
//! Each side keeps its own layout; this only pairs nodes by path so a
//! differential renderer can color them.

use crate::aggregator::call_tree::{CallTree, NodePath};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Change in a frame's total value between two profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDelta {
    pub path: NodePath,

    /// Total value in the baseline (0 when the frame is new)
    pub before: u64,

    /// Total value in the target (0 when the frame disappeared)
    pub after: u64,

    /// `(after - before) / before`; `None` when `before` is 0
    pub delta: Option<f64>,
}

impl FrameDelta {
    /// Absolute change, can be negative
    pub fn absolute_change(&self) -> i128 {
        i128::from(self.after) - i128::from(self.before)
    }

    pub fn is_new(&self) -> bool {
        self.before == 0 && self.after > 0
    }

    pub fn is_removed(&self) -> bool {
        self.before > 0 && self.after == 0
    }
}

/// Pair every path of `before` and `after` and compute its relative change
///
/// # Returns
/// One entry per path present in either tree, sorted by path
pub fn diff_trees(before: &CallTree, after: &CallTree) -> Vec<FrameDelta> {
    let mut totals: BTreeMap<NodePath, (u64, u64)> = BTreeMap::new();

    for (path, entry) in before.walk() {
        totals.entry(path).or_default().0 = entry.node.total_value;
    }
    for (path, entry) in after.walk() {
        totals.entry(path).or_default().1 = entry.node.total_value;
    }

    let deltas: Vec<FrameDelta> = totals
        .into_iter()
        .map(|(path, (before, after))| FrameDelta {
            path,
            before,
            after,
            delta: relative_change(before, after),
        })
        .collect();

    debug!("Compared {} frame positions", deltas.len());
    deltas
}

fn relative_change(before: u64, after: u64) -> Option<f64> {
    if before == 0 {
        None
    } else {
        Some((after as f64 - before as f64) / before as f64)
    }
}
