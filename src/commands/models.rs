use crate::flamegraph::Orientation;
use crate::utils::config::{DEFAULT_LAYOUT_WIDTH, DEFAULT_TEXT_COLUMNS};

/// Where a command reads its profile from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A built-in dataset by name
    Demo(String),

    /// Profile text already read from stdin
    Text(String),
}

/// How the layout command prints its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Arguments for the layout command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct LayoutArgs {
    pub input: InputSource,

    /// Width budget of the active root
    pub width: f64,

    /// Path of the node to zoom into (`main;handleRequest`)
    pub zoom: Option<String>,

    /// Search query to highlight
    pub search: Option<String>,

    pub format: OutputFormat,

    pub orientation: Orientation,

    /// Terminal columns for text output
    pub columns: usize,
}

impl Default for LayoutArgs {
    fn default() -> Self {
        Self {
            input: InputSource::Demo("request".to_string()),
            width: DEFAULT_LAYOUT_WIDTH,
            zoom: None,
            search: None,
            format: OutputFormat::Json,
            orientation: Orientation::Flame,
            columns: DEFAULT_TEXT_COLUMNS,
        }
    }
}
