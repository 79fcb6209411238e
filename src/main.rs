mod catalog;
mod classifier;
mod cli;
mod db;
mod enrich;
mod error;
mod fmt;
mod hasher;
mod importer;
mod models;
mod normalizer;
mod patterns;
mod payee;
mod settings;
mod txn_type;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{AccountsCommands, Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("penny=warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Accounts { command } => match command {
            AccountsCommands::Add {
                name,
                number,
                institution,
            } => cli::accounts::add(&name, number.as_deref(), institution.as_deref()),
            AccountsCommands::List => cli::accounts::list(),
        },
        Commands::Import { file, account } => cli::import::run(&file, account.as_deref()),
        Commands::Classify => cli::classify::run(),
        Commands::Patterns => cli::patterns::list(),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
