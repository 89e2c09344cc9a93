//! Error types for the codebook library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for codebook operations.
#[derive(Debug, Error)]
pub enum CodebookError {
    /// A column contract was given an invalid field at construction.
    #[error("Invalid {field}: {message}")]
    Construction {
        field: &'static str,
        message: String,
    },

    /// The declared data type is not one of the supported primitives.
    #[error("Unknown data type '{0}' (expected one of: str, bool, int, float)")]
    UnknownDataType(String),

    /// The column described by a contract is not part of the map.
    #[error("{column} is not a column in the supplied map!")]
    MissingColumn { column: String },

    /// Values in the map fall outside the declared domain.
    #[error("The following are not valid values for '{column}': {}", values.join(" | "))]
    InvalidValues { column: String, values: Vec<String> },

    /// One or more values could not be cast to the declared data type.
    #[error("{column} cannot be cast to {dtype}: {}", values.join(" | "))]
    Coercion {
        column: String,
        dtype: String,
        values: Vec<String>,
    },

    /// A cleaning step was requested from a column kind that lacks it.
    #[error("Step '{step}' is not supported by {kind} column '{column}'")]
    UnsupportedStep {
        column: String,
        kind: String,
        step: String,
    },

    /// A column did not match the shape of the map it was added to.
    #[error("Shape mismatch: {0}")]
    Shape(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing delimited data.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodebookError {
    /// Shorthand for a construction failure on `field`.
    pub fn construction(field: &'static str, message: impl Into<String>) -> Self {
        CodebookError::Construction {
            field,
            message: message.into(),
        }
    }
}

/// Result type alias for codebook operations.
pub type Result<T> = std::result::Result<T, CodebookError>;
