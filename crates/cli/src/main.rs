use std::process::ExitCode;

fn main() -> ExitCode {
    cartview_cli::run()
}
