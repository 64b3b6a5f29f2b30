use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no source found matching prefix '{prefix}'")]
    SourceNotFound { prefix: String },

    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("failed to write export rows: {0}")]
    Serialization(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
