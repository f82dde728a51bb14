//! JSON report output writer.
//!
//! Serializes layout reports to any writer (stdout in the CLI).

use crate::aggregator::call_tree::CallTree;
use crate::flamegraph::layout::{LayoutConfig, PositionedNode};
use crate::flamegraph::search::SearchResult;
use crate::flamegraph::zoom::ZoomState;
use crate::parser::schema::LayoutReport;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, warn};
use std::io::Write;

/// Assemble a report from an already computed layout
///
/// **Public** - used by the layout command
///
/// The breadcrumbs follow the nodes: when the layout is not rooted at the
/// zoom's active root (the target went stale), only the true root is listed.
pub fn build_report(
    tree: &CallTree,
    zoom: &ZoomState,
    config: &LayoutConfig,
    nodes: Vec<PositionedNode>,
    search: Option<SearchResult>,
) -> LayoutReport {
    let zoom = match nodes.first() {
        Some(first) if zoom.is_zoomed() && &first.path != zoom.active_root() => {
            warn!(
                "Layout is not rooted at zoom target '{}', reporting the true root",
                zoom.active_root()
            );
            vec![tree.root_path()]
        }
        _ => zoom.breadcrumbs(),
    };

    LayoutReport {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        width: config.width,
        total_value: tree.total_value(),
        zoom,
        nodes,
        search,
    }
}

/// Write a report as pretty JSON
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::WriteFailed` - I/O error on the writer
pub fn write_report<W: Write>(report: &LayoutReport, mut writer: W) -> Result<(), OutputError> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()?;

    debug!("Report written: {} nodes", report.nodes.len());
    Ok(())
}

/// Write a report to a string (for testing or in-memory use)
pub fn report_to_string(report: &LayoutReport) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(report)?)
}
