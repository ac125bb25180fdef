//! Error types for report output.

use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    /// The CSV encoder rejected a record.
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Writing or flushing the output failed.
    #[error("failed to write report output: {0}")]
    Write(#[from] std::io::Error),

    /// Creating or replacing an export file failed.
    #[error("failed to write {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rendered CSV was not valid UTF-8.
    #[error("rendered CSV is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
