//! A single provenance record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of action recorded in a provenance log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformType {
    /// Values were rewritten into another representation.
    Transformation,
    /// Values were substituted one for one.
    Replace,
    /// Values were mapped to missing.
    Drop,
    /// A structural check on the map.
    Validation,
    /// A domain check that passed.
    Pass,
    /// A domain check that failed.
    Error,
    /// The log itself was exported.
    Recording,
}

impl TransformType {
    /// Get the lowercase label used in exported tables.
    pub fn label(&self) -> &'static str {
        match self {
            TransformType::Transformation => "transformation",
            TransformType::Replace => "replace",
            TransformType::Drop => "drop",
            TransformType::Validation => "validation",
            TransformType::Pass => "pass",
            TransformType::Error => "error",
            TransformType::Recording => "recording",
        }
    }

    /// Returns true for actions that changed cell values.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            TransformType::Transformation | TransformType::Replace | TransformType::Drop
        )
    }
}

impl fmt::Display for TransformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of a column's audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    /// When the action happened.
    pub timestamp: DateTime<Utc>,

    /// Column the action applied to.
    pub column: String,

    /// Short verb describing the action (e.g. "Cast data type").
    pub command: String,

    /// Category of action.
    pub transform_type: TransformType,

    /// Human-readable description of the value-level mapping.
    pub transformation: String,
}

impl ProvenanceRecord {
    /// Create a record stamped with the current time.
    pub fn now(
        column: impl Into<String>,
        command: impl Into<String>,
        transform_type: TransformType,
        transformation: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            column: column.into(),
            command: command.into(),
            transform_type,
            transformation: transformation.into(),
        }
    }
}
