use clap::Parser;
use straddlelab::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
