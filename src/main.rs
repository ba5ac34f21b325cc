//! Binary entrypoint for the `reachcheck` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    reachcheck::observability::init_logging();
    // Recording is handled in commands::dispatch via REACHCHECK_RECORD=<dir>.
    match reachcheck::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
