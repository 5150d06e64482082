use busy_schedule::cli::{self, CliError};
use busy_schedule::logging::init_logging;
use std::env;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = match cli::parse(&args, |key| env::var(key).ok()) {
        Ok(invocation) => invocation,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}\n\n{}", cli::usage());
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    match cli::run(invocation, stdin.lock(), &mut stdout, &mut stderr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
