use thiserror::Error;

use crate::grouper::GroupingError;
use crate::importer::MalformedRowError;
use crate::matcher::PatternError;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Pattern(#[from] PatternError),

    #[error("{0}")]
    Grouping(#[from] GroupingError),

    #[error("{0}")]
    MalformedRow(#[from] MalformedRowError),

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("No data source configured. Run `tally load <file>` first.")]
    NoSource,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
