//! Ensayo binary entry point.

use clap::Parser;
use ensayo_cli::{logging, runner, Cli, CliResult};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    logging::init(Path::new(ensayo::DEFAULT_LOG_PATH))?;

    let rt = tokio::runtime::Runtime::new().map_err(|e| {
        ensayo_cli::CliError::test_execution(format!("Failed to create runtime: {e}"))
    })?;

    rt.block_on(runner::run(&cli))
}
