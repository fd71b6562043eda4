//! CLI argument definitions for the layout inspector.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "lit-layout",
    version,
    about = "Inspect LIT panel layouts",
    long_about = "Compute which panels a LIT layout renders for a set of models.\n\n\
                  Layout catalogs are read from TOML or JSON; model and dataset\n\
                  specs are read from JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute and print the render layout for one catalog layout.
    Render(RenderArgs),

    /// List the layouts in a catalog.
    Layouts(LayoutsArgs),

    /// List the built-in modules.
    Modules(ModulesArgs),
}

#[derive(Parser)]
pub struct RenderArgs {
    /// Layout catalog (.toml or .json).
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    /// Layout to render (default: the catalog's default layout).
    #[arg(long = "layout", value_name = "NAME")]
    pub layout: Option<String>,

    /// JSON file mapping model names to model specs.
    #[arg(long = "models", value_name = "PATH")]
    pub models: Option<PathBuf>,

    /// JSON file holding the dataset spec.
    #[arg(long = "dataset", value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Render in example comparison mode.
    #[arg(long = "compare")]
    pub compare: bool,

    /// URL query to restore, e.g. `hidden_modules=Main_Color&tab=Main`.
    #[arg(long = "url-config", value_name = "QUERY")]
    pub url_config: Option<String>,

    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct LayoutsArgs {
    /// Layout catalog (.toml or .json).
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ModulesArgs {
    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
