//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod inspect;
pub mod layout;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use inspect::{execute_fold, execute_search, execute_summary};
pub use layout::{execute_layout, load_tree, validate_args};
pub use models::{InputSource, LayoutArgs, OutputFormat};
pub use utils::{display_schema, display_version};
