use std::process::ExitCode;

fn main() -> ExitCode {
    deck::cli::run()
}
