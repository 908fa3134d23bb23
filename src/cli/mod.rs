pub mod categories;
pub mod import;
pub mod imports;
pub mod init;
pub mod load;
pub mod status;
pub mod transactions;

use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::db::get_connection;
use crate::error::{Result, TallyError};
use crate::settings::get_db_path;

/// Open the configured database, refusing to create a fresh file implicitly.
pub(crate) fn open_db() -> Result<Connection> {
    let db_path = get_db_path();
    if !db_path.exists() {
        return Err(TallyError::NotInitialized(db_path));
    }
    get_connection(&db_path)
}

#[derive(Parser)]
#[command(name = "tally", version, about = "Import CSV transactions and keep their categories tidy.")]
pub struct Cli {
    /// Log import details to stderr (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up tally: choose a data directory and initialize the database.
    Init {
        /// Path for tally data (default: ~/Documents/tally)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import a CSV of transactions (title,type,value,category).
    ///
    /// Missing categories are created. The file is deleted once its
    /// transactions are saved.
    Import {
        /// Path to the CSV file
        file: String,
    },
    /// List categories with their transaction counts.
    Categories,
    /// List transactions and the current balance.
    Transactions,
    /// List past imports.
    Imports,
    /// Switch to an existing tally data directory.
    Load {
        /// Path to data directory containing tally.db
        path: String,
    },
    /// Show current database and summary statistics.
    Status,
}
