//! Provenance tracking for column transformations.
//!
//! Every column contract owns a [`ProvenanceLog`]. Each operation that checks
//! or rewrites the column appends a [`ProvenanceRecord`], and the log can be
//! exported as a [`ProvenanceTable`] with the fixed headers
//! `timestamp, column, command, transform_type, transformation`.
//!
//! ```text
//! timestamp                    column    command             transform_type  transformation
//! 2024-05-01T10:00:00.000Z     position  convert to numeric  transformation  Striker >>> 0 | D-man >>> 1
//! 2024-05-01T10:00:00.100Z     position  Write Log           recording
//! ```

mod log;
mod record;
mod table;

pub use log::{ProvenanceLog, WRITE_LOG_COMMAND};
pub use record::{ProvenanceRecord, TransformType};
pub use table::{ProvenanceTable, PROVENANCE_COLUMNS};
