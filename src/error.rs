use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum YnaiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File '{}' does not exist", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Parse error at {record}: {reason}")]
    Parse { record: String, reason: String },

    #[error("Unknown {kind}: {name}")]
    UnknownName { kind: &'static str, name: String },

    #[error("Amount {0} is too large to convert to milliunits")]
    AmountOverflow(i64),

    #[error("No transactions to upload")]
    EmptyBatch,

    #[error("Invalid token: authentication with YNAB failed")]
    AuthenticationFailed,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, YnaiError>;
