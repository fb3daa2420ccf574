//! Error types for the retrieval core

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Corpus is empty")]
    EmptyCorpus,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown ranking model: {0}")]
    UnknownModel(String),

    #[error("Malformed query on line {line}: {reason}")]
    MalformedQuery { line: u64, reason: String },

    #[error("Corpus error: {0}")]
    Corpus(String),
}

pub type Result<T> = std::result::Result<T, Error>;
