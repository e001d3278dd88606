//! Error types for zzrun

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    /// File could not be read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed line of a JSON-lines event file
    #[error("invalid event on line {line}: {source}")]
    EventLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration rejected by the pipeline
    #[error("configuration error: {0}")]
    Core(#[from] zzcore::Error),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl RunError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RunError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RunError>;
