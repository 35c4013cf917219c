//! strata binary entry point.

use std::process::ExitCode;

use strata::ui::output;

fn main() -> ExitCode {
    match strata::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
