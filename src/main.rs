mod categorizer;
mod cli;
mod error;
mod fmt;
mod importer;
mod models;
mod reports;
mod settings;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = match cli.command {
        Commands::Report { path } => cli::report::run(path),
        Commands::Breakdown { file } => cli::breakdown::run(&file),
        Commands::Init {
            statements_dir,
            currency,
            platform,
        } => cli::init::run(statements_dir, currency, platform),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}
