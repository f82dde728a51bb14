//! Read-only commands that inspect a profile without laying it out.

use super::layout::load_tree;
use super::models::InputSource;
use crate::flamegraph::{generate_text_summary, search};
use anyhow::Result;
use log::info;
use std::io::Write;

/// Print the profile as collapsed stack lines
///
/// Nested trees are flattened back to one line per leaf position.
pub fn execute_fold<W: Write>(input: &InputSource, out: &mut W) -> Result<()> {
    let tree = load_tree(input)?;
    let folded = tree.to_folded();
    info!("Writing {} folded stacks", folded.len());

    for stack in &folded {
        writeln!(out, "{}", stack.to_line())?;
    }
    Ok(())
}

/// Print the paths matching `query` and their aggregate self value
pub fn execute_search<W: Write>(input: &InputSource, query: &str, out: &mut W) -> Result<()> {
    let tree = load_tree(input)?;
    let result = search(&tree, query);

    let Some(stats) = &result.stats else {
        writeln!(out, "No query given")?;
        return Ok(());
    };

    for path in &result.matches {
        let self_value = tree.find(path).map(|n| n.self_value).unwrap_or(0);
        writeln!(out, "{} {}", path, self_value)?;
    }
    writeln!(
        out,
        "Matched: {} frames, {} of {} samples ({}%)",
        stats.count,
        stats.self_value,
        tree.total_value(),
        stats.percentage_label()
    )?;
    Ok(())
}

/// Print the hottest frames table
pub fn execute_summary<W: Write>(input: &InputSource, top: usize, out: &mut W) -> Result<()> {
    let tree = load_tree(input)?;
    writeln!(out, "{}", generate_text_summary(&tree, top))?;
    Ok(())
}
