use std::process::ExitCode;

fn main() -> ExitCode {
    match mehelper::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("mehelper: {e}");
            ExitCode::FAILURE
        }
    }
}
