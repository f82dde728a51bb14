//! Flame Layout CLI
//!
//! Folds stack samples, lays them out as a flame graph and prints the
//! result as JSON or as an ASCII chart.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;

use flame_layout::commands::{
    display_schema, display_version, execute_fold, execute_layout, execute_search,
    execute_summary, validate_args, InputSource, LayoutArgs, OutputFormat,
};
use flame_layout::flamegraph::Orientation;
use flame_layout::utils::config::{DEFAULT_LAYOUT_WIDTH, DEFAULT_TEXT_COLUMNS};

/// Flame Layout - flame graph layout engine
#[derive(Parser, Debug)]
#[command(name = "flame-layout")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Where to read the profile from
#[derive(Args, Debug)]
struct InputOpts {
    /// Use a built-in dataset instead of stdin (request, realistic)
    #[arg(long)]
    demo: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Json,
    Text,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrientationArg {
    Flame,
    Icicle,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the profile as collapsed stack lines
    Fold {
        #[command(flatten)]
        input: InputOpts,
    },

    /// Lay out the profile, optionally zoomed and searched
    Layout {
        #[command(flatten)]
        input: InputOpts,

        /// Width budget of the active root
        #[arg(short, long, default_value_t = DEFAULT_LAYOUT_WIDTH)]
        width: f64,

        /// Path of the node to zoom into, e.g. "main;handleRequest"
        #[arg(short, long)]
        zoom: Option<String>,

        /// Highlight frames whose name contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: FormatArg,

        /// Root at the bottom (flame) or top (icicle), text only
        #[arg(long, value_enum, default_value = "flame")]
        orientation: OrientationArg,

        /// Terminal columns, text only
        #[arg(long, default_value_t = DEFAULT_TEXT_COLUMNS)]
        columns: usize,
    },

    /// Print paths whose frame name contains a query
    Search {
        #[command(flatten)]
        input: InputOpts,

        /// Case-insensitive substring to look for
        query: String,
    },

    /// Print the hottest frames by self value
    Summary {
        #[command(flatten)]
        input: InputOpts,

        /// Number of frames to show
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Display report schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    // Execute command
    match cli.command {
        Commands::Fold { input } => {
            execute_fold(&read_input(input)?, &mut out)?;
        }

        Commands::Layout {
            input,
            width,
            zoom,
            search,
            format,
            orientation,
            columns,
        } => {
            let args = LayoutArgs {
                input: read_input(input)?,
                width,
                zoom,
                search,
                format: match format {
                    FormatArg::Json => OutputFormat::Json,
                    FormatArg::Text => OutputFormat::Text,
                },
                orientation: match orientation {
                    OrientationArg::Flame => Orientation::Flame,
                    OrientationArg::Icicle => Orientation::Icicle,
                },
                columns,
            };

            // Validate args first
            validate_args(&args)?;

            execute_layout(&args, &mut out)?;
        }

        Commands::Search { input, query } => {
            execute_search(&read_input(input)?, &query, &mut out)?;
        }

        Commands::Summary { input, top } => {
            execute_summary(&read_input(input)?, top, &mut out)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Resolve `--demo` or slurp stdin
///
/// **Private** - internal helper
fn read_input(opts: InputOpts) -> Result<InputSource> {
    match opts.demo {
        Some(name) => Ok(InputSource::Demo(name)),
        None => {
            let text = std::io::read_to_string(std::io::stdin())
                .context("Failed to read profile from stdin")?;
            Ok(InputSource::Text(text))
        }
    }
}
