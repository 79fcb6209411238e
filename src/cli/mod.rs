pub mod accounts;
pub mod classify;
pub mod import;
pub mod init;
pub mod patterns;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "penny", about = "Bank/brokerage CSV import and transaction auto-categorization.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up Penny: choose a data directory and initialize the database.
    Init {
        /// Path for Penny data (default: ~/Documents/penny)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage accounts.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// Import a CSV export and classify its transactions.
    Import {
        /// Path to the CSV file to import
        file: String,
        /// Account name to import into (default: resolved from the file)
        #[arg(long)]
        account: Option<String>,
    },
    /// Re-run classification over rows that still need review.
    Classify,
    /// List learned classification patterns.
    Patterns,
    /// Show database summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// Add a new account.
    Add {
        /// Account name, e.g. 'Primary Checking'
        name: String,
        /// Account number or last-four
        #[arg(long)]
        number: Option<String>,
        /// Institution name
        #[arg(long)]
        institution: Option<String>,
    },
    /// List all accounts.
    List,
}
