use clap::Parser;
use quantis::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
