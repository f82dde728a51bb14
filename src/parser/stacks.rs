//! Text and JSON input parsing.
//!
//! Handles three forms a sample source may hand us:
//! - raw stack lines (`main;foo;bar`, one sample per line)
//! - collapsed lines (`main;foo;bar 42`)
//! - a nested JSON tree (`{"name": ..., "value": ..., "children": [...]}`)

use super::schema::SampleNode;
use crate::aggregator::call_tree::{build_tree, build_tree_from_samples, CallTree};
use crate::aggregator::stack_folder::{merge_folded, FoldedStack};
use crate::utils::config::FRAME_SEPARATOR;
use crate::utils::error::ParseError;
use log::debug;

/// Input after format detection
#[derive(Debug, Clone)]
pub enum ParsedInput {
    /// Folded stacks from text lines
    Folded(Vec<FoldedStack>),

    /// Pre-aggregated nested tree
    Tree(SampleNode),
}

impl ParsedInput {
    /// Build and validate the call tree for this input
    pub fn into_tree(self) -> Result<CallTree, ParseError> {
        let tree = match self {
            ParsedInput::Folded(folded) => build_tree(&folded)?,
            ParsedInput::Tree(sample) => build_tree_from_samples(&sample)?,
        };
        Ok(tree)
    }
}

/// Parse raw stack lines, one sample per line
///
/// Blank lines and `#` comments are skipped.
pub fn parse_stack_lines(text: &str) -> Vec<Vec<String>> {
    content_lines(text)
        .map(|(_, line)| line.split(FRAME_SEPARATOR).map(|f| f.trim().to_string()).collect())
        .collect()
}

/// Parse collapsed lines (`a;b;c 42`)
///
/// A line without a trailing count is one sample. Repeated paths are merged.
///
/// # Errors
/// * `ParseError::InvalidLine` - the trailing count is zero or not an integer
/// * `ParseError::MalformedTree` - repeated lines for one path overflow u64
pub fn parse_collapsed(text: &str) -> Result<Vec<FoldedStack>, ParseError> {
    let mut entries = Vec::new();

    for (line_no, line) in content_lines(text) {
        let (stack, count) = match line.rsplit_once(char::is_whitespace) {
            Some((stack, token)) if token.chars().all(|c| c.is_ascii_digit()) => {
                let count: u64 = token.parse().map_err(|e| ParseError::InvalidLine {
                    line: line_no,
                    reason: format!("bad sample count '{}': {}", token, e),
                })?;
                (stack.trim_end(), count)
            }
            Some((_, token)) if token.starts_with('-') || token.contains('.') => {
                return Err(ParseError::InvalidLine {
                    line: line_no,
                    reason: format!("sample count '{}' is not a positive integer", token),
                });
            }
            _ => (line, 1),
        };

        if count == 0 {
            return Err(ParseError::InvalidLine {
                line: line_no,
                reason: "sample count must be positive".to_string(),
            });
        }

        let frames: Vec<&str> = stack.split(FRAME_SEPARATOR).map(str::trim).collect();
        entries.push(FoldedStack::new(frames.join(FRAME_SEPARATOR), count));
    }

    let folded = merge_folded(entries)?;
    debug!("Parsed {} collapsed stacks", folded.len());
    Ok(folded)
}

/// Parse a nested JSON sample tree
pub fn parse_sample_tree(json: &str) -> Result<SampleNode, ParseError> {
    let sample: SampleNode = serde_json::from_str(json)?;
    Ok(sample)
}

/// Detect the input form and parse it
///
/// Text whose first non-blank character is `{` is a nested JSON tree;
/// anything else is read as collapsed lines (raw stack lines are the
/// special case of count 1).
pub fn parse_input(text: &str) -> Result<ParsedInput, ParseError> {
    if text.trim_start().starts_with('{') {
        debug!("Detected nested JSON tree input");
        Ok(ParsedInput::Tree(parse_sample_tree(text)?))
    } else {
        debug!("Detected collapsed stack input");
        Ok(ParsedInput::Folded(parse_collapsed(text)?))
    }
}

fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}
