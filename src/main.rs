use std::process::ExitCode;

fn main() -> ExitCode {
    reflect_cli::run_cli()
}
