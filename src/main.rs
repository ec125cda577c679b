use clap::Parser;
use quantdash::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    quantdash::cli::init_tracing();
    run(Cli::parse())
}
