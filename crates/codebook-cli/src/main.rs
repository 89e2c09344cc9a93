//! Codebook CLI - check and clean metadata maps against a data dictionary.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use logging::{LogConfig, init_logging};

fn main() {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose, cli.log_format));

    let result = match cli.command {
        Commands::Validate {
            map,
            dictionary,
            json,
        } => commands::validate::run(map, dictionary, json),

        Commands::Clean {
            map,
            dictionary,
            output,
            log,
        } => commands::clean::run(map, dictionary, output, log),

        Commands::Log { file, column, json } => commands::log::run(file, column, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
