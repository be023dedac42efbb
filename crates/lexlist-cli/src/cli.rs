//! CLI argument definitions for the lexlist harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "lexlist",
    version,
    about = "Replay recorded list responses through the pagination coordinator",
    long_about = "Interpret recorded backend responses and replay them through the\n\
                  filter store, request coordinator and scroll trigger.\n\n\
                  Handy for checking a new endpoint's envelope before wiring it up."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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
    /// Interpret a single recorded response and print the resulting page.
    Inspect(InspectArgs),

    /// Replay a sequence of recorded responses with simulated scrolling.
    Replay(ReplayArgs),
}

#[derive(Parser)]
pub struct InspectArgs {
    /// JSON file holding one backend response.
    #[arg(value_name = "RESPONSE")]
    pub response: PathBuf,

    /// List profile (TOML) with config and filter schema.
    #[arg(long = "profile", value_name = "PATH")]
    pub profile: Option<PathBuf>,

    /// Page size the request is assumed to have asked for.
    #[arg(long = "page-size", default_value_t = 20)]
    pub page_size: usize,

    /// Search offset the request is assumed to have started at.
    #[arg(long = "offset", default_value_t = 0)]
    pub offset: u64,
}

#[derive(Parser)]
pub struct ReplayArgs {
    /// JSON file holding an array of backend responses, served in order.
    #[arg(value_name = "PAGES")]
    pub pages: PathBuf,

    /// List profile (TOML) with config and filter schema.
    #[arg(long = "profile", value_name = "PATH")]
    pub profile: Option<PathBuf>,

    /// Filter edit applied before the first load, as key=value.
    #[arg(long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,

    /// Number of scroll-to-bottom gestures to simulate.
    #[arg(long = "scrolls", default_value_t = 5)]
    pub scrolls: usize,

    /// Page URL the list starts on.
    #[arg(long = "url", default_value = "https://example.test/list")]
    pub url: String,
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
