//! Build the Bangalore QGIS project.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use bangalore_cli::{CliError, build};

fn main() -> ExitCode {
    bangalore_cli::init_logging();
    match build::run() {
        Ok(path) => {
            println!("Project written: {path}");
            ExitCode::SUCCESS
        }
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("build-project: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
