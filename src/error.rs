// src/error.rs
//! Error kinds surfaced to the user. Each one is caught at the boundary
//! closest to where it happens and turned into a readable message.

use thiserror::Error;

/// Rejected search parameters. Blocks the invocation, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Please select at least one job board.")]
    NoSiteSelected,
    #[error("Unknown job board '{0}'")]
    UnknownSite(String),
    #[error("Unknown job type '{0}'")]
    UnknownJobType(String),
    #[error("Unknown country '{0}'")]
    UnknownCountry(String),
    #[error("Unknown sort order '{0}'")]
    UnknownSortOrder(String),
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

/// Failure of the external search call.
#[derive(Debug, Clone, Error)]
#[error("An error occurred during the search: {message}")]
pub struct SearchError {
    pub message: String,
    /// Full cause chain, shown in the detailed trace view.
    pub detail: String,
}

impl SearchError {
    pub fn from_backend(err: &anyhow::Error) -> Self {
        Self {
            message: format!("{:#}", err),
            detail: format!("{:?}", err),
        }
    }

    pub fn suggestions() -> Vec<String> {
        vec![
            "Try reducing the number of job boards or results per board".to_string(),
            "Check your network connection".to_string(),
        ]
    }
}

/// Rich rendering failure for a single record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("description markup is malformed ({0} parse errors)")]
    MalformedMarkup(usize),
    #[error("description has an unterminated code block")]
    UnterminatedCodeBlock,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV buffer: {0}")]
    Flush(String),
    #[error("exported CSV is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// Either way a user-triggered search can stop short.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Search(#[from] SearchError),
}
