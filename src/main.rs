//! Main entry point for the archtune CLI app

use archtune::{cli, driver};

fn main() -> std::process::ExitCode {
    let args = match cli::run() {
        Ok(args) => args,
        Err(e) => {
            // clap prints --help and --version itself; they are not failures.
            let _ = e.print();
            return if e.use_stderr() {
                std::process::ExitCode::FAILURE
            } else {
                std::process::ExitCode::SUCCESS
            };
        }
    };
    if let Err(e) = driver::run(&args) {
        eprintln!("Error: {}", e);
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}
