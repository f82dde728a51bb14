//! Layout command implementation.
//!
//! The layout command:
//! 1. Loads the profile (demo dataset or stdin text)
//! 2. Builds and validates the call tree
//! 3. Applies the requested zoom
//! 4. Runs the search query against the full tree
//! 5. Writes the report or the ASCII chart

use super::models::{InputSource, LayoutArgs, OutputFormat};
use crate::aggregator::call_tree::{CallTree, NodePath};
use crate::flamegraph::{render_ascii, search, zoomed_layout, LayoutConfig, ZoomState};
use crate::output::{build_report, write_report};
use crate::parser::parse_input;
use crate::samples;
use crate::utils::config::{DEMO_DATASETS, MAX_TEXT_COLUMNS};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::io::Write;

/// Execute the layout command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unknown demo dataset or unparsable input
/// * Malformed tree (inconsistent declared values)
/// * Write failures on `out`
pub fn execute_layout<W: Write>(args: &LayoutArgs, out: &mut W) -> Result<()> {
    info!("Step 1/4: Loading profile...");
    let tree = load_tree(&args.input)?;

    info!("Step 2/4: Applying zoom...");
    let mut zoom = ZoomState::new(&tree);
    if let Some(target) = &args.zoom {
        let path = NodePath::from(target.as_str());
        if !zoom.zoom_in(&tree, &path) {
            warn!("Cannot zoom into '{}': not an inner node of this profile", target);
        }
    }

    let config = LayoutConfig::new().with_width(args.width);
    let nodes = zoomed_layout(&tree, &zoom, &config).context("Failed to compute layout")?;
    debug!("Layout produced {} nodes", nodes.len());

    info!("Step 3/4: Searching...");
    let matches = args.search.as_deref().map(|query| search(&tree, query));
    if let Some(stats) = matches.as_ref().and_then(|m| m.stats.as_ref()) {
        info!("Search matched {} frames ({}%)", stats.count, stats.percentage_label());
    }

    info!("Step 4/4: Writing output...");
    match args.format {
        OutputFormat::Json => {
            let report = build_report(&tree, &zoom, &config, nodes, matches);
            write_report(&report, &mut *out).context("Failed to write layout report")?;
        }
        OutputFormat::Text => {
            let chart = render_ascii(&nodes, config.width, args.columns, args.orientation);
            writeln!(out, "{}", chart)?;
            if let Some(stats) = matches.as_ref().and_then(|m| m.stats.as_ref()) {
                writeln!(
                    out,
                    "\nMatched: {} frames, {} samples ({}%)",
                    stats.count,
                    stats.self_value,
                    stats.percentage_label()
                )?;
            }
        }
    }

    Ok(())
}

/// Load and validate the call tree for an input source
///
/// **Public** - shared by every command that needs a tree
pub fn load_tree(input: &InputSource) -> Result<CallTree> {
    let parsed = match input {
        InputSource::Demo(name) => samples::by_name(name).with_context(|| {
            format!("Unknown demo dataset '{}' (expected one of: {})", name, DEMO_DATASETS.join(", "))
        })?,
        InputSource::Text(text) => parse_input(text).context("Failed to parse profile input")?,
    };

    let tree = parsed.into_tree().context("Refusing to lay out a malformed profile")?;
    info!(
        "Loaded profile: root '{}', {} samples, {} nodes",
        tree.root().name,
        tree.total_value(),
        tree.node_count()
    );
    Ok(tree)
}

/// Validate layout arguments
///
/// **Public** - can be called before execute_layout for early validation
pub fn validate_args(args: &LayoutArgs) -> Result<()> {
    if !args.width.is_finite() || args.width <= 0.0 {
        anyhow::bail!("width must be a positive number");
    }

    if args.columns == 0 {
        anyhow::bail!("columns must be greater than 0");
    }

    if args.columns > MAX_TEXT_COLUMNS {
        anyhow::bail!("columns is too large (max {})", MAX_TEXT_COLUMNS);
    }

    if let Some(zoom) = &args.zoom {
        if zoom.trim().is_empty() {
            anyhow::bail!("zoom path cannot be empty");
        }
    }

    if let InputSource::Demo(name) = &args.input {
        if !DEMO_DATASETS.contains(&name.as_str()) {
            anyhow::bail!("Unknown demo dataset '{}'", name);
        }
    }

    Ok(())
}
