// src/utils/error.rs
use crate::extractors::cells::CellRole;
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error {status} for {url}")]
    Http { status: reqwest::StatusCode, url: String },

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Saving debug capture of {url} failed: {source}")]
    Capture { url: String, source: std::io::Error },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid cell selector: {0}")]
    Selector(String),

    #[error("Misaligned table section {section}: {left_count} {left:?} cells but {right_count} {right:?} cells")]
    Alignment {
        section: u8,
        left: CellRole,
        left_count: usize,
        right: CellRole,
        right_count: usize,
    },

    #[error("Party column {position} should be '{expected}' but the page has {found:?}")]
    PartyMismatch {
        position: usize,
        expected: String,
        found: Option<String>,
    },

    #[error("Page lists {extra} parties beyond the {expected} header columns")]
    UnexpectedParties { expected: usize, extra: usize },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row has {found} fields but the header has {expected}")]
    RowWidth { expected: usize, found: usize },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Fetching page failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("No districts found on {0}")]
    EmptyResult(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
