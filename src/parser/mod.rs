//! Input parsing and schema definitions.
//!
//! This module handles:
//! - Parsing raw and collapsed stack lines
//! - Parsing nested JSON sample trees
//! - Detecting which of the two a caller handed us
//! - Defining the output report schema

pub mod schema;
pub mod stacks;

// Re-export main types
pub use schema::{LayoutReport, SampleNode};
pub use stacks::{
    parse_collapsed, parse_input, parse_sample_tree, parse_stack_lines, ParsedInput,
};
