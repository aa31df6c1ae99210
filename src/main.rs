use std::process::ExitCode;

fn main() -> ExitCode {
    match clearwatch_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("clearwatch: {e}");
            ExitCode::FAILURE
        }
    }
}
