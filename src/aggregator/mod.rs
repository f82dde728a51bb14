//! Aggregation of stack samples into folded stacks and call trees.
//!
//! This module transforms raw samples into:
//! - Folded stacks (unique path + sample count)
//! - A validated call tree with self and total values per node

pub mod call_tree;
pub mod stack_folder;

// Re-export main types and functions
pub use call_tree::{build_tree, build_tree_from_samples, CallTree, NodePath, TreeEntry, TreeNode};
pub use stack_folder::{expand_folded, fold_stacks, merge_folded, total_count, FoldedStack};
