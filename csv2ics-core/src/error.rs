//! Error types for the conversion pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a conversion.
///
/// Row-level problems (non-data rows, unparsable dates, undecodable records)
/// never show up here; they are counted and reported instead.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not read metadata file {path}: {message}")]
    MetadataFile { path: PathBuf, message: String },

    #[error("Could not open input file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV read error: {0}")]
    Read(#[from] csv::Error),

    #[error("Could not write calendar to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;
