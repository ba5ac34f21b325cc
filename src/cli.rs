//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `reachcheck`.
#[derive(Debug, Parser)]
#[command(
    name = "reachcheck",
    version,
    about = "Check a graph's reachability index against its edges"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch rows, link them, and check every index invariant.
    Check(CheckArgs),
    /// Fetch rows and print graph statistics.
    Stats(SourceArgs),
}

/// Where to read rows from. Overrides the environment.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Read rows from a JSON snapshot file.
    #[arg(long, value_name = "PATH", conflicts_with = "endpoint")]
    pub snapshot: Option<PathBuf>,
    /// Query rows from a GraphQL endpoint.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,
    /// Replay every port from a cassette file or recording directory.
    #[arg(long, value_name = "CASSETTE", conflicts_with_all = ["snapshot", "endpoint"])]
    pub replay: Option<PathBuf>,
}

/// Arguments for `reachcheck check`.
#[derive(Debug, Clone, Default, Args)]
pub struct CheckArgs {
    /// Row source selection.
    #[command(flatten)]
    pub source: SourceArgs,
    /// Directory to write reports into.
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,
    /// Write a report even when the check passes.
    #[arg(long)]
    pub always_report: bool,
}
