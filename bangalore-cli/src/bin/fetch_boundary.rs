//! Save the Bangalore boundary from Nominatim as GeoJSON.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use bangalore_cli::{CliError, fetch};

fn main() -> ExitCode {
    bangalore_cli::init_logging();
    match fetch::run() {
        Ok(path) => {
            println!("Saved boundary to {path}");
            ExitCode::SUCCESS
        }
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("fetch-boundary: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
