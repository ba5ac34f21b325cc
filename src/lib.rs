//! Rebuilds a navigable graph from flat node, link, and index rows and checks
//! that the materialized reachability index agrees with the edges.
//!
//! The core is [`graph::link`] followed by [`graph::check`]; both are pure and
//! never fail. Everything around them (row fetching, report storage,
//! record/replay) sits behind the traits in [`ports`].

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod graph;
pub mod observability;
pub mod ports;
pub mod report;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails, the command fails,
/// or the check produced findings.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}
