//! Configuration and constants for the engine and the CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Separator between frame names in folded stacks and node paths
pub const FRAME_SEPARATOR: &str = ";";

/// Name given to the synthesized root when stacks disagree on frame 0
pub const IMPLICIT_ROOT_NAME: &str = "root";

/// Width budget used when the caller does not pick one (unit interval)
pub const DEFAULT_LAYOUT_WIDTH: f64 = 1.0;

// Relative tolerance for floating-point interval comparisons
pub const LAYOUT_TOLERANCE: f64 = 1e-9;

/// Terminal columns used by the ASCII renderer
pub const DEFAULT_TEXT_COLUMNS: usize = 100;
pub const MAX_TEXT_COLUMNS: usize = 1000;

/// Names accepted by `--demo`
pub const DEMO_DATASETS: &[&str] = &["request", "realistic"];
