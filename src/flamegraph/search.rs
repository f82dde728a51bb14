//! Case-insensitive frame search over the full call tree.
//!
//! Statistics are always taken against the unzoomed tree so that search
//! results stay put while the user zooms around.

use crate::aggregator::call_tree::{CallTree, NodePath};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Aggregate statistics across matching positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// Number of matching tree positions
    pub count: usize,

    /// Sum of matching nodes' self values
    pub self_value: u64,

    /// `self_value` as a percentage of the true root's total
    pub percentage: f64,
}

impl SearchStats {
    /// Percentage with one decimal, e.g. "11.5"
    pub fn percentage_label(&self) -> String {
        format!("{:.1}", self.percentage)
    }
}

/// Matches for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub matches: BTreeSet<NodePath>,

    /// `None` when there was no query at all; `Some` with a zero count when
    /// the query matched nothing
    pub stats: Option<SearchStats>,
}

impl SearchResult {
    pub fn is_match(&self, path: &NodePath) -> bool {
        self.matches.contains(path)
    }

    pub fn has_query(&self) -> bool {
        self.stats.is_some()
    }
}

/// Find every node whose name contains `query`, ignoring case
///
/// **Public** - main entry point for search
///
/// The query is trimmed first; an empty or whitespace-only query yields no
/// matches and no statistics.
pub fn search(tree: &CallTree, query: &str) -> SearchResult {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchResult {
            query: query.to_string(),
            matches: BTreeSet::new(),
            stats: None,
        };
    }

    let mut matches = BTreeSet::new();
    let mut self_value = 0u64;

    for (path, entry) in tree.walk() {
        if entry.node.name.to_lowercase().contains(&needle) {
            self_value += entry.node.self_value;
            matches.insert(path);
        }
    }

    let total = tree.total_value();
    let percentage = if total > 0 {
        self_value as f64 * 100.0 / total as f64
    } else {
        0.0
    };

    debug!(
        "Search '{}' matched {} positions ({} self, {:.1}%)",
        needle,
        matches.len(),
        self_value,
        percentage
    );

    SearchResult {
        query: query.to_string(),
        stats: Some(SearchStats {
            count: matches.len(),
            self_value,
            percentage,
        }),
        matches,
    }
}
