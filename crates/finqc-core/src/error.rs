//! Error types for the finqc-core library.

use thiserror::Error;

/// Main error type for the finqc library.
#[derive(Error, Debug)]
pub enum FinqcError {
    /// Table parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Document or statement extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Line item classification error.
    #[error("classification error: {0}")]
    Classification(#[from] ClassificationError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning table text into a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The text does not contain a usable pipe-delimited table.
    #[error("no usable table")]
    NoUsableTable,

    /// The table has fewer than two columns.
    #[error("insufficient columns: found {found}, need at least 2")]
    InsufficientColumns { found: usize },

    /// Every data row was empty or filtered out.
    #[error("table has no data rows")]
    NoRows,
}

/// Errors related to obtaining source text and statement tables.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No source text could be obtained for the document.
    #[error("no source text could be extracted from {0}")]
    NoSourceText(String),

    /// An external extraction service failed.
    #[error("extraction service failed: {0}")]
    Collaborator(String),

    /// A single statement table could not be located.
    #[error("no table found for {statement}: {reason}")]
    StatementTable { statement: String, reason: String },
}

/// Errors related to line item classification.
#[derive(Error, Debug)]
pub enum ClassificationError {
    /// The classification service failed.
    #[error("classification service failed: {0}")]
    Service(String),

    /// The classification response did not have the expected shape.
    #[error("malformed classification response: {0}")]
    MalformedResponse(String),
}

/// Result type for the finqc library.
pub type Result<T> = std::result::Result<T, FinqcError>;
