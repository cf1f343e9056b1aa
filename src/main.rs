//! alex - inspect items in a personal document archive

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = libalex::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
