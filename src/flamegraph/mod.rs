//! Flame graph layout, zoom, search and comparison.
//!
//! This module converts a call tree into positioned rectangles that a
//! renderer can draw, plus the derived views around them: zoom-scoped
//! sub-layouts, search matches and before/after deltas.

pub mod diff;
pub mod layout;
pub mod search;
pub mod text;
pub mod zoom;

// Re-export main types
pub use diff::{diff_trees, FrameDelta};
pub use layout::{compute_layout, LayoutConfig, PositionedNode};
pub use search::{search, SearchResult, SearchStats};
pub use text::{generate_text_summary, render_ascii, truncate_label, Orientation};
pub use zoom::{zoomed_layout, ZoomState};
