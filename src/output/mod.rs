//! Output writers for layout reports.
//!
//! This module handles writing data in machine-readable form:
//! - JSON layout reports (pretty)

pub mod json;

// Re-export main functions
pub use json::{build_report, report_to_string, write_report};
