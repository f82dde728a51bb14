//! Flame Layout
//!
//! A flame graph layout engine: folds stack samples, builds a validated
//! call tree, and lays it out as proportionally sized rectangles with
//! zoom and search on top.
//!
//! ## Getting Started
//!
//! ```
//! use flame_layout::aggregator::{build_tree, fold_stacks};
//! use flame_layout::flamegraph::{compute_layout, LayoutConfig};
//!
//! let stacks = vec![vec!["main", "parse"], vec!["main", "parse"], vec!["main", "log"]];
//! let tree = build_tree(&fold_stacks(&stacks)).unwrap();
//! let nodes = compute_layout(&tree, &LayoutConfig::new()).unwrap();
//!
//! // Siblings are ordered by name: "log" sits left of "parse".
//! assert_eq!(nodes[1].name, "log");
//! ```
//!
//! The `flame-layout` binary wraps the same engine for terminals:
//!
//! ```bash
//! flame-layout layout --demo realistic --format text
//! ```

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod parser;
pub mod samples;
pub mod utils;
