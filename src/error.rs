use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the collector library
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("FTP error: {0}")]
    Ftp(#[from] suppaftp::FtpError),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unrecognized format: {0} columns")]
    UnrecognizedFormat(usize),

    #[error("malformed date token: {0}")]
    MalformedDate(String),

    #[error("output directory already exists: {0}")]
    OutputDirExists(PathBuf),

    #[error("{0}")]
    Other(String),
}

impl CollectorError {
    /// Attach a path to a raw IO error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CollectorError>;
