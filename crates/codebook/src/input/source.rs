//! Metadata describing where a map was loaded from.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns, not counting the index.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Tokens read as missing when loading a map, compared case-insensitively.
///
/// Kept to spellings that cannot be a real category; labels such as `none`
/// are left for a contract's missing vocabulary to handle.
pub const DEFAULT_NULL_TOKENS: [&str; 4] = ["na", "n/a", "nan", "null"];

/// Check if a raw cell is empty or one of the default null tokens.
pub fn is_null_value(value: &str) -> bool {
    is_null_token(value, &DEFAULT_NULL_TOKENS)
}

/// Check if a raw cell is empty or matches one of `tokens`.
pub fn is_null_token<S: AsRef<str>>(value: &str, tokens: &[S]) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || tokens.iter().any(|t| trimmed.eq_ignore_ascii_case(t.as_ref().trim()))
}
