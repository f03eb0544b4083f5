use std::process::ExitCode;

fn main() -> ExitCode {
    xwiki_rest_cli::run()
}
