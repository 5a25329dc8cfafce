use std::process::ExitCode;

fn main() -> miette::Result<ExitCode> {
    skein::cli::run()
}
