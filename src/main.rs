//! Stage Config CLI
//!
//! Entry point for the `stage-config` command-line tool.

use clap::Parser;
use stage_config::cli::{run, Cli};
use stage_config::logging;
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_level) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
