//! Main entry point for the rowdiff CLI

use clap::Parser;
use rowdiff::cli::Cli;
use rowdiff::commands::execute_command;

fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; env_logger fixes its filter at build time, so
    // the verbose flag has to be folded in here
    env_logger::Builder::from_default_env()
        .filter_level(cli.log_level())
        .init();

    // Execute the command
    if let Err(e) = execute_command(cli.command, !cli.no_color) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
