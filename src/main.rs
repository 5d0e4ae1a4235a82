use std::process::ExitCode;

fn main() -> ExitCode {
    match gitgum::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            gitgum::cli::report(&err);
            ExitCode::FAILURE
        }
    }
}
