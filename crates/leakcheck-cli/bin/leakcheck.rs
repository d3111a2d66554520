//! leakcheck binary entry point.
//!
//! Parses arguments, sets up logging, runs the lookup and prints the report.
//! Exits with 0 when no candidate was found, 2 when any was, and 1 on error.

use leakcheck_cli::{CliConfig, EXIT_ERROR, init_tracing, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = CliConfig::from_args();
    init_tracing(config.verbose);

    tracing::debug!(file = %config.file.display(), "Starting leakcheck");

    match run(&config) {
        Ok(report) => {
            if config.json {
                match report.to_json() {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        return ExitCode::from(EXIT_ERROR);
                    }
                }
            } else {
                print!("{}", report.to_text());
            }
            ExitCode::from(report.exit_status())
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
