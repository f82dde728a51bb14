//! Build the call tree from folded stacks or from a pre-aggregated nested tree.
//!
//! Every frame is merged across all stacks that pass through it at the same
//! position, so a node is identified by its path from the root, not by name.
//! After construction the tree is checked for value conservation:
//! `total_value == self_value + sum(children.total_value)` at every node.

use super::stack_folder::{sort_folded, FoldedStack};
use crate::parser::schema::SampleNode;
use crate::utils::config::{FRAME_SEPARATOR, IMPLICIT_ROOT_NAME};
use crate::utils::error::MalformedTreeError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

/// Unique identity of a node: its ancestors' names and its own, `;`-joined
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(String);

impl NodePath {
    /// Path of a root node
    pub fn root(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Path of the child `name` below this node
    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}{}{}", self.0, FRAME_SEPARATOR, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Frame names from the root down to this node
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(FRAME_SEPARATOR)
    }

    /// Distance from the true root (the root itself is 0)
    pub fn depth(&self) -> usize {
        self.0.matches(FRAME_SEPARATOR).count()
    }

    /// Name of the node this path points at
    pub fn name(&self) -> &str {
        self.0.rsplit(FRAME_SEPARATOR).next().unwrap_or(&self.0)
    }

    /// Every path from the root down to (and including) this one
    pub fn prefixes(&self) -> Vec<NodePath> {
        let mut prefixes: Vec<NodePath> = Vec::with_capacity(self.depth() + 1);
        for segment in self.segments() {
            let next = match prefixes.last() {
                Some(parent) => parent.child(segment),
                None => NodePath::root(segment),
            };
            prefixes.push(next);
        }
        prefixes
    }

    /// True when `other` is this node or lies in its subtree
    pub fn contains(&self, other: &NodePath) -> bool {
        other.0 == self.0
            || (other.0.starts_with(&self.0)
                && other.0[self.0.len()..].starts_with(FRAME_SEPARATOR))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodePath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for NodePath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// One function merged across every stack that reaches it at this position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,

    /// Samples in this node and all of its descendants
    pub total_value: u64,

    /// Samples where this frame was the top of the stack
    pub self_value: u64,

    /// Children keyed by name; iteration order is lexicographic
    pub children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total_value: 0,
            self_value: 0,
            children: BTreeMap::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.get(name)
    }

    /// Children in lexicographic order of name
    pub fn sorted_children(&self) -> impl Iterator<Item = &TreeNode> {
        self.children.values()
    }

    /// Sum of the children's totals, `None` if it overflows u64
    pub fn children_total(&self) -> Option<u64> {
        self.children
            .values()
            .try_fold(0u64, |acc, c| acc.checked_add(c.total_value))
    }

    // Callers check that the root total cannot overflow; no node below it
    // holds more than the root.
    fn insert(&mut self, stack: &[&str], count: u64) {
        self.total_value += count;
        match stack.split_first() {
            Some((head, tail)) => {
                let child = self
                    .children
                    .entry(head.to_string())
                    .or_insert_with(|| TreeNode::new(*head));
                child.insert(tail, count);
            }
            None => self.self_value += count,
        }
    }
}

/// A node visited during a pre-order walk
#[derive(Debug, Clone, Copy)]
pub struct TreeEntry<'a> {
    pub node: &'a TreeNode,
    pub depth: usize,
}

/// Immutable call tree snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTree {
    root: TreeNode,
    implicit_root: bool,
}

impl CallTree {
    /// Wrap an externally built root, checking the conservation invariant
    pub fn from_root(root: TreeNode) -> Result<Self, MalformedTreeError> {
        validate_node(&root, &NodePath::root(&root.name))?;
        Ok(Self {
            root,
            implicit_root: false,
        })
    }

    /// True when the root was synthesized because stacks disagreed on frame 0
    pub fn has_implicit_root(&self) -> bool {
        self.implicit_root
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    pub fn root_path(&self) -> NodePath {
        NodePath::root(&self.root.name)
    }

    pub fn total_value(&self) -> u64 {
        self.root.total_value
    }

    pub fn is_empty(&self) -> bool {
        self.root.total_value == 0
    }

    /// Look up a node by its path from the true root
    pub fn find(&self, path: &NodePath) -> Option<&TreeNode> {
        let mut segments = path.segments();
        if segments.next()? != self.root.name {
            return None;
        }
        segments.try_fold(&self.root, |node, name| node.child(name))
    }

    /// Pre-order walk with children in lexicographic order
    pub fn walk(&self) -> Vec<(NodePath, TreeEntry<'_>)> {
        let mut out = Vec::new();
        walk_node(&self.root, self.root_path(), 0, &mut out);
        out
    }

    pub fn node_count(&self) -> usize {
        fn count(node: &TreeNode) -> usize {
            1 + node.children.values().map(count).sum::<usize>()
        }
        count(&self.root)
    }

    /// Fold the tree back into one stack per node with self samples
    ///
    /// A synthesized root is left out of the paths.
    pub fn to_folded(&self) -> Vec<FoldedStack> {
        let skip = if self.implicit_root {
            self.root.name.len() + FRAME_SEPARATOR.len()
        } else {
            0
        };

        // Tree paths are unique, so there is nothing to merge.
        let mut stacks: Vec<FoldedStack> = self
            .walk()
            .into_iter()
            .filter(|(path, entry)| entry.node.self_value > 0 && path.as_str().len() > skip)
            .map(|(path, entry)| FoldedStack::new(&path.as_str()[skip..], entry.node.self_value))
            .collect();
        sort_folded(&mut stacks);
        stacks
    }

    pub fn max_depth(&self) -> usize {
        fn depth(node: &TreeNode) -> usize {
            node.children.values().map(|c| depth(c) + 1).max().unwrap_or(0)
        }
        depth(&self.root)
    }
}

fn walk_node<'a>(
    node: &'a TreeNode,
    path: NodePath,
    depth: usize,
    out: &mut Vec<(NodePath, TreeEntry<'a>)>,
) {
    let child_paths: Vec<(NodePath, &TreeNode)> = node
        .sorted_children()
        .map(|child| (path.child(&child.name), child))
        .collect();
    out.push((path, TreeEntry { node, depth }));
    for (child_path, child) in child_paths {
        walk_node(child, child_path, depth + 1, out);
    }
}

/// Build a call tree from folded stacks
///
/// **Public** - main entry point for tree building
///
/// # Arguments
/// * `folded` - Folded stacks (path + count)
///
/// # Returns
/// A tree rooted at the first frame shared by every stack. When stacks start
/// with different frames an implicit `root` node parents them. No input
/// yields an implicit root with zero value.
///
/// # Errors
/// * `MalformedTreeError::InvalidFrameName` - a stack contains an empty frame
pub fn build_tree(folded: &[FoldedStack]) -> Result<CallTree, MalformedTreeError> {
    debug!("Building call tree from {} folded stacks", folded.len());

    let mut implicit = TreeNode::new(IMPLICIT_ROOT_NAME);

    for entry in folded {
        if entry.count == 0 {
            continue;
        }
        let frames: Vec<&str> = entry.frames().collect();
        if let Some(pos) = frames.iter().position(|f| f.trim().is_empty()) {
            return Err(MalformedTreeError::InvalidFrameName {
                path: frames[..pos].join(FRAME_SEPARATOR),
                name: frames[pos].to_string(),
            });
        }
        if implicit.total_value.checked_add(entry.count).is_none() {
            return Err(MalformedTreeError::ValueOverflow {
                path: entry.stack.clone(),
            });
        }
        implicit.insert(&frames, entry.count);
    }

    let synthesized = implicit.children.len() != 1;
    let root = if synthesized {
        implicit
    } else {
        match implicit.children.into_values().next() {
            Some(only) => only,
            None => TreeNode::new(IMPLICIT_ROOT_NAME),
        }
    };

    let mut tree = CallTree::from_root(root)?;
    tree.implicit_root = synthesized;
    debug!(
        "Built call tree: root '{}' total {} across {} nodes",
        tree.root.name,
        tree.root.total_value,
        tree.node_count()
    );
    Ok(tree)
}

/// Build a call tree from a nested, pre-aggregated sample tree
///
/// Folding is skipped; declared `value`/`selfValue` are taken as given and
/// then validated. A missing `selfValue` is 0.
pub fn build_tree_from_samples(sample: &SampleNode) -> Result<CallTree, MalformedTreeError> {
    debug!("Building call tree from nested sample '{}'", sample.name);

    let root_path = check_name(None, &sample.name)?;
    let root = convert_sample(sample, &root_path)?;
    CallTree::from_root(root)
}

fn check_name(parent: Option<&NodePath>, name: &str) -> Result<NodePath, MalformedTreeError> {
    if name.trim().is_empty() || name.contains(FRAME_SEPARATOR) {
        return Err(MalformedTreeError::InvalidFrameName {
            path: parent.map(NodePath::to_string).unwrap_or_default(),
            name: name.to_string(),
        });
    }
    Ok(match parent {
        Some(parent) => parent.child(name),
        None => NodePath::root(name),
    })
}

fn convert_sample(sample: &SampleNode, path: &NodePath) -> Result<TreeNode, MalformedTreeError> {
    let mut node = TreeNode::new(sample.name.clone());
    node.total_value = sample.value;
    node.self_value = sample.self_value.unwrap_or(0);

    for child in &sample.children {
        let child_path = check_name(Some(path), &child.name)?;
        let converted = convert_sample(child, &child_path)?;
        match node.children.entry(child.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(converted);
            }
            Entry::Occupied(_) => {
                return Err(MalformedTreeError::DuplicateChild {
                    path: path.to_string(),
                    name: child.name.clone(),
                });
            }
        }
    }

    Ok(node)
}

fn validate_node(node: &TreeNode, path: &NodePath) -> Result<(), MalformedTreeError> {
    let overflow = || MalformedTreeError::ValueOverflow {
        path: path.to_string(),
    };
    let children = node.children_total().ok_or_else(overflow)?;
    let parts = node.self_value.checked_add(children).ok_or_else(overflow)?;

    if node.total_value < parts {
        return Err(MalformedTreeError::TotalBelowParts {
            path: path.to_string(),
            total: node.total_value,
            self_value: node.self_value,
            children,
        });
    }
    if node.total_value > parts {
        return Err(MalformedTreeError::UnattributedValue {
            path: path.to_string(),
            total: node.total_value,
            self_value: node.self_value,
            children,
        });
    }

    for child in node.children.values() {
        validate_node(child, &path.child(&child.name))?;
    }
    Ok(())
}
