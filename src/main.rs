mod cli;
mod config;
mod extract_cmd;
mod files_cmd;
mod logging;
mod request;
mod validate_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Extract(args) => extract_cmd::run(args),
        Command::Files(args) => files_cmd::run(args),
        Command::Validate(args) => validate_cmd::run(args),
    }
}
