//! Fold raw stack samples into collapsed stack format.
//!
//! Folding merges identical stacks into a single entry with a count.
//! Format: "parent;child;grandchild count"
//!
//! Example: "main;handleRequest;log 3"
//! This means: three samples caught `log` on top of `handleRequest` on top of `main`.

use crate::utils::config::FRAME_SEPARATOR;
use crate::utils::error::MalformedTreeError;
use log::{debug, warn};
use std::collections::HashMap;

/// A single folded stack entry
///
/// **Public** - consumed by the tree builder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FoldedStack {
    /// Stack path as semicolon-separated string, root first
    pub stack: String,

    /// Number of raw samples that produced exactly this path
    pub count: u64,
}

impl FoldedStack {
    /// Create a new folded stack
    pub fn new(stack: impl Into<String>, count: u64) -> Self {
        Self {
            stack: stack.into(),
            count,
        }
    }

    /// Frames of this stack, root first
    pub fn frames(&self) -> impl Iterator<Item = &str> {
        self.stack.split(FRAME_SEPARATOR)
    }

    /// Render as a collapsed-format line ("a;b;c 42")
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.count)
    }
}

/// Fold raw stacks into one entry per unique path
///
/// **Public** - main entry point for folding
///
/// # Arguments
/// * `stacks` - Raw stacks, each an ordered sequence of frame names (root first)
///
/// # Returns
/// Folded stacks sorted by descending count, ties broken by path.
/// The order carries no meaning; it only keeps output deterministic.
pub fn fold_stacks<S: AsRef<str>>(stacks: &[Vec<S>]) -> Vec<FoldedStack> {
    let mut stack_map: HashMap<String, u64> = HashMap::new();
    let mut raw_count = 0usize;

    for stack in stacks {
        let frames = stack.as_slice();
        raw_count += 1;

        if frames.is_empty() {
            warn!("Skipping empty stack sample #{}", raw_count);
            continue;
        }

        let key = frames
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(FRAME_SEPARATOR);

        *stack_map.entry(key).or_insert(0) += 1;
    }

    let folded = into_sorted(stack_map);
    debug!("Folded {} raw stacks into {} unique paths", raw_count, folded.len());
    folded
}

/// Re-fold an already-folded multiset, summing counts of equal paths
///
/// Applying this to its own output changes nothing.
///
/// # Errors
/// * `MalformedTreeError::ValueOverflow` - the counts of one path overflow u64
pub fn merge_folded<I>(folded: I) -> Result<Vec<FoldedStack>, MalformedTreeError>
where
    I: IntoIterator<Item = FoldedStack>,
{
    let mut stack_map: HashMap<String, u64> = HashMap::new();
    for entry in folded {
        if entry.count == 0 {
            continue;
        }
        let FoldedStack { stack, count } = entry;
        let slot = stack_map.entry(stack.clone()).or_insert(0);
        *slot = slot
            .checked_add(count)
            .ok_or(MalformedTreeError::ValueOverflow { path: stack })?;
    }
    Ok(into_sorted(stack_map))
}

/// Expand folded stacks back into raw stacks, `count` copies each
pub fn expand_folded(folded: &[FoldedStack]) -> Vec<Vec<String>> {
    folded
        .iter()
        .flat_map(|entry| {
            let frames: Vec<String> = entry.frames().map(str::to_string).collect();
            std::iter::repeat(frames).take(entry.count as usize)
        })
        .collect()
}

/// Total sample count across folded stacks, `None` if it overflows u64
pub fn total_count(folded: &[FoldedStack]) -> Option<u64> {
    folded.iter().try_fold(0u64, |acc, s| acc.checked_add(s.count))
}

/// Sort by descending count, ties broken by path
pub(crate) fn sort_folded(stacks: &mut [FoldedStack]) {
    stacks.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.stack.cmp(&b.stack)));
}

fn into_sorted(stack_map: HashMap<String, u64>) -> Vec<FoldedStack> {
    let mut stacks: Vec<FoldedStack> = stack_map
        .into_iter()
        .map(|(stack, count)| FoldedStack::new(stack, count))
        .collect();

    sort_folded(&mut stacks);
    stacks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folded_stack_to_line() {
        let stack = FoldedStack::new("main;execute;parse", 1000);
        assert_eq!(stack.to_line(), "main;execute;parse 1000");
    }

    #[test]
    fn test_fold_counts_identical_stacks() {
        let stacks = vec![
            vec!["main", "a"],
            vec!["main", "b"],
            vec!["main", "a"],
            vec!["main"],
        ];

        let folded = fold_stacks(&stacks);

        assert_eq!(folded.len(), 3);
        assert_eq!(folded[0], FoldedStack::new("main;a", 2));
        assert_eq!(total_count(&folded), Some(4));
        assert!(folded.contains(&FoldedStack::new("main", 1)));
    }

    #[test]
    fn test_fold_empty_input() {
        let stacks: Vec<Vec<String>> = Vec::new();
        assert!(fold_stacks(&stacks).is_empty());
    }

    #[test]
    fn test_fold_skips_empty_stack() {
        let stacks = vec![vec![], vec!["main".to_string()]];
        let folded = fold_stacks(&stacks);
        assert_eq!(folded, vec![FoldedStack::new("main", 1)]);
    }

    #[test]
    fn test_merge_folded_is_idempotent() {
        let folded = vec![
            FoldedStack::new("main;a", 2),
            FoldedStack::new("main;b", 1),
            FoldedStack::new("main;a", 3),
        ];

        let once = merge_folded(folded).unwrap();
        let twice = merge_folded(once.clone()).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once[0], FoldedStack::new("main;a", 5));
    }

    #[test]
    fn test_merge_folded_rejects_count_overflow() {
        let folded = vec![FoldedStack::new("main;a", u64::MAX), FoldedStack::new("main;a", 1)];

        let err = merge_folded(folded).unwrap_err();
        assert_eq!(
            err,
            MalformedTreeError::ValueOverflow {
                path: "main;a".to_string()
            }
        );
    }

    #[test]
    fn test_total_count_overflow() {
        let folded = vec![FoldedStack::new("main;a", u64::MAX), FoldedStack::new("main;b", 1)];
        assert_eq!(total_count(&folded), None);
    }

    #[test]
    fn test_expand_folded() {
        let folded = vec![FoldedStack::new("main;a", 2)];
        let raw = expand_folded(&folded);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[1], vec!["main".to_string(), "a".to_string()]);
    }
}
