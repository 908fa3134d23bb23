use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: unknown transaction type '{value}' (expected income or outcome)")]
    InvalidType { line: u64, value: String },

    #[error("Line {line}: '{value}' is not a number")]
    InvalidValue { line: u64, value: String },

    #[error("Category did not resolve after reconciliation: {0}")]
    UnresolvedCategory(String),

    #[error("No database at {0}. Run `tally init` first.")]
    NotInitialized(PathBuf),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
