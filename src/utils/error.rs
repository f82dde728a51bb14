//! Error types for the entire library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised when a call tree's aggregate values are inconsistent
///
/// Every variant carries the `;`-joined path of the offending node.
/// These are never recovered locally: a caller should refuse to render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedTreeError {
    #[error("Malformed tree at '{path}': total {total} is less than self {self_value} plus children {children}")]
    TotalBelowParts {
        path: String,
        total: u64,
        self_value: u64,
        children: u64,
    },

    #[error("Malformed tree at '{path}': total {total} exceeds self {self_value} plus children {children}")]
    UnattributedValue {
        path: String,
        total: u64,
        self_value: u64,
        children: u64,
    },

    #[error("Malformed tree at '{path}': duplicate child '{name}'")]
    DuplicateChild { path: String, name: String },

    #[error("Malformed tree at '{path}': invalid frame name '{name}'")]
    InvalidFrameName { path: String, name: String },

    #[error("Malformed tree at '{path}': sample values overflow u64")]
    ValueOverflow { path: String },
}

impl MalformedTreeError {
    /// Path of the node that failed validation
    pub fn path(&self) -> &str {
        match self {
            Self::TotalBelowParts { path, .. }
            | Self::UnattributedValue { path, .. }
            | Self::DuplicateChild { path, .. }
            | Self::InvalidFrameName { path, .. }
            | Self::ValueOverflow { path } => path,
        }
    }
}

/// Errors that can occur while parsing profile input
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid input on line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },

    #[error(transparent)]
    MalformedTree(#[from] MalformedTreeError),
}

/// Errors that can occur while computing a layout
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Layout width must be finite and positive, got {0}")]
    InvalidWidth(f64),
}

/// Errors that can occur during report output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
