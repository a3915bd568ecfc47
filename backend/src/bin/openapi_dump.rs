//! Write the repair desk OpenAPI document to stdout as pretty JSON.

use std::io::{self, Write as _};
use std::process::ExitCode;

use repair_desk::ApiDoc;
use utoipa::OpenApi;

fn main() -> ExitCode {
    let json = match ApiDoc::openapi().to_pretty_json() {
        Ok(json) => json,
        Err(err) => {
            eprintln!("could not serialise OpenAPI document: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut stdout = io::stdout().lock();
    if let Err(err) = writeln!(stdout, "{json}") {
        eprintln!("could not write OpenAPI document: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
