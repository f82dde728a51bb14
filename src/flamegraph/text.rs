//! Plain-text rendering of a layout for terminals.
//!
//! One text row per depth. Flame orientation puts the root on the last line
//! (root at bottom); icicle puts it on the first.

use super::layout::PositionedNode;
use crate::aggregator::call_tree::CallTree;
use std::collections::HashMap;

/// Vertical orientation of the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Depth 0 drawn at the bottom
    #[default]
    Flame,
    /// Depth 0 drawn at the top
    Icicle,
}

/// Fit `name` into `cells` characters, `..` marking a cut
///
/// Returns `None` when fewer than 3 cells are available.
pub fn truncate_label(name: &str, cells: usize) -> Option<String> {
    if cells < 3 {
        return None;
    }
    if name.chars().count() <= cells {
        return Some(name.to_string());
    }
    let kept: String = name.chars().take(cells - 2).collect();
    Some(format!("{}..", kept))
}

/// Render positioned nodes as an ASCII chart
///
/// # Arguments
/// * `nodes` - Layout output (full or zoomed)
/// * `width` - Width budget the layout was computed with
/// * `columns` - Terminal columns to map that width onto
/// * `orientation` - Flame (root at bottom) or icicle (root at top)
pub fn render_ascii(
    nodes: &[PositionedNode],
    width: f64,
    columns: usize,
    orientation: Orientation,
) -> String {
    let Some(max_depth) = nodes.iter().map(|n| n.depth).max() else {
        return String::new();
    };
    if columns == 0 || width <= 0.0 {
        return String::new();
    }

    let scale = columns as f64 / width;
    let mut rows: Vec<Vec<char>> = vec![vec![' '; columns]; max_depth + 1];

    for node in nodes {
        let start = ((node.x0 * scale).round() as usize).min(columns);
        let end = ((node.x1 * scale).round() as usize).min(columns);
        if end <= start {
            continue;
        }

        let row = &mut rows[node.depth];
        row[start] = '|';
        for cell in row.iter_mut().take(end).skip(start + 1) {
            *cell = '-';
        }
        if let Some(label) = truncate_label(&node.name, end - start - 1) {
            for (offset, c) in label.chars().enumerate() {
                row[start + 1 + offset] = c;
            }
        }
    }

    let mut lines: Vec<String> = rows
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect();

    if orientation == Orientation::Flame {
        lines.reverse();
    }
    lines.join("\n")
}

/// Create a table of the hottest frames by self value
///
/// Self values are summed per name across all tree positions.
pub fn generate_text_summary(tree: &CallTree, max_lines: usize) -> String {
    let mut by_name: HashMap<&str, (u64, usize)> = HashMap::new();
    for (_, entry) in tree.walk() {
        let slot = by_name.entry(entry.node.name.as_str()).or_insert((0, 0));
        slot.0 += entry.node.self_value;
        slot.1 += 1;
    }

    let mut hottest: Vec<(&str, u64, usize)> = by_name
        .into_iter()
        .filter(|(_, (self_value, _))| *self_value > 0)
        .map(|(name, (self_value, positions))| (name, self_value, positions))
        .collect();
    hottest.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let total = tree.total_value().max(1);
    let mut lines = Vec::new();

    lines.push("  HOTTEST FRAMES (by self value)".to_string());
    lines.push(format!("  ┏{}┳{}┳{}┳{}┓", "━".repeat(34), "━".repeat(12), "━".repeat(11), "━".repeat(9)));
    lines.push(format!("  ┃ {:<32} ┃ {:^10} ┃ {:^9} ┃ {:^7} ┃", "Frame", "SELF", "POSITIONS", "%"));
    lines.push(format!("  ┣{}╋{}╋{}╋{}┫", "━".repeat(34), "━".repeat(12), "━".repeat(11), "━".repeat(9)));

    for (name, self_value, positions) in hottest.iter().take(max_lines) {
        let percentage = *self_value as f64 * 100.0 / total as f64;
        let display = truncate_label(name, 32).unwrap_or_default();
        lines.push(format!(
            "  ┃ {:<32} ┃ {:>10} ┃ {:>9} ┃ {:>6.1}% ┃",
            display, self_value, positions, percentage
        ));
    }

    lines.push(format!("  ┗{}┻{}┻{}┻{}┛", "━".repeat(34), "━".repeat(12), "━".repeat(11), "━".repeat(9)));

    if hottest.len() > max_lines {
        lines.push(String::new());
        lines.push(format!("   (Showing top {} of {} frames)", max_lines, hottest.len()));
    }

    lines.join("\n")
}
