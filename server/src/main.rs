use std::{error::Error, process::ExitCode};

use bolao_server::{ClapParser, Cli};

fn main() -> ExitCode {
    match bolao_server::main(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
