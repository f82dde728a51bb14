//! Input and output JSON schema definitions.
//!
//! `SampleNode` is the nested, pre-aggregated tree a sample source may supply.
//! `LayoutReport` is what we write out for a renderer. The report schema is
//! versioned to allow future evolution.

use crate::aggregator::call_tree::NodePath;
use crate::flamegraph::layout::PositionedNode;
use crate::flamegraph::search::SearchResult;
use serde::{Deserialize, Serialize};

/// A node of the nested input form: `{name, value, selfValue?, children?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleNode {
    /// Function name
    pub name: String,

    /// Inclusive value (self plus descendants)
    pub value: u64,

    /// Exclusive value; absent means 0
    #[serde(rename = "selfValue", default, skip_serializing_if = "Option::is_none")]
    pub self_value: Option<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SampleNode>,
}

impl SampleNode {
    /// Leaf whose whole value is self time
    pub fn leaf(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
            self_value: Some(value),
            children: Vec::new(),
        }
    }

    /// Inner node; `value` is derived from `self_value` plus the children
    ///
    /// The sum saturates at `u64::MAX`, which tree validation then rejects.
    pub fn branch(name: impl Into<String>, self_value: u64, children: Vec<SampleNode>) -> Self {
        let value = children
            .iter()
            .fold(self_value, |acc, c| acc.saturating_add(c.value));
        Self {
            name: name.into(),
            value,
            self_value: Some(self_value),
            children,
        }
    }
}

/// Render-ready layout written for a renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Width budget the intervals are expressed in
    pub width: f64,

    /// Total value of the true (unzoomed) root
    pub total_value: u64,

    /// Zoom breadcrumbs from the true root to the active root
    pub zoom: Vec<NodePath>,

    /// Positioned nodes in pre-order
    pub nodes: Vec<PositionedNode>,

    /// Search matches and statistics, when a query was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::build_tree_from_samples;

    #[test]
    fn test_branch_sums_children() {
        let node = SampleNode::branch("main", 2, vec![SampleNode::leaf("a", 3), SampleNode::leaf("b", 5)]);
        assert_eq!(node.value, 10);
        assert_eq!(node.self_value, Some(2));
    }

    #[test]
    fn test_branch_saturates_on_overflow() {
        let node = SampleNode::branch("main", 1, vec![SampleNode::leaf("a", u64::MAX)]);
        assert_eq!(node.value, u64::MAX);
        assert!(build_tree_from_samples(&node).is_err());
    }
}
