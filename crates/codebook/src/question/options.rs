//! Optional construction parameters for column contracts.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::schema::Value;

/// Sentinel strings recognised as "no data" when no vocabulary is given.
pub const DEFAULT_MISSING: [&str; 7] = [
    "not applicable",
    "missing: not provided",
    "missing: not collected",
    "missing: restricted",
    "not provided",
    "not collected",
    "restricted",
];

/// The default missing-value vocabulary as a set.
pub fn default_missing() -> BTreeSet<String> {
    DEFAULT_MISSING.iter().map(|s| s.to_string()).collect()
}

/// A missing-value vocabulary given as one string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MissingValues {
    One(String),
    Many(Vec<String>),
}

impl MissingValues {
    /// Normalize into a set.
    pub fn into_set(self) -> BTreeSet<String> {
        match self {
            MissingValues::One(s) => BTreeSet::from([s]),
            MissingValues::Many(values) => values.into_iter().collect(),
        }
    }
}

impl From<&str> for MissingValues {
    fn from(s: &str) -> Self {
        MissingValues::One(s.to_string())
    }
}

impl From<Vec<String>> for MissingValues {
    fn from(values: Vec<String>) -> Self {
        MissingValues::Many(values)
    }
}

impl From<Vec<&str>> for MissingValues {
    fn from(values: Vec<&str>) -> Self {
        MissingValues::Many(values.into_iter().map(String::from).collect())
    }
}

/// Optional fields shared by every column contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionOptions {
    /// Human-readable label (defaults to the title-cased name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_name: Option<String>,

    /// Whether the column holds unconstrained text.
    #[serde(default)]
    pub free_response: bool,

    /// Whether the column is a MIMARKS standard field.
    #[serde(default)]
    pub mimarks: bool,

    /// Ontology the values are drawn from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology: Option<String>,

    /// Whether EBI requires the column.
    #[serde(default)]
    pub ebi_required: bool,

    /// Whether Qiita requires the column.
    #[serde(default)]
    pub qiita_required: bool,

    /// Missing-value vocabulary (defaults to [`DEFAULT_MISSING`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<MissingValues>,
}

impl QuestionOptions {
    /// Create options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the clean name.
    pub fn with_clean_name(mut self, clean_name: impl Into<String>) -> Self {
        self.clean_name = Some(clean_name.into());
        self
    }

    /// Mark the column as free response.
    pub fn with_free_response(mut self, free_response: bool) -> Self {
        self.free_response = free_response;
        self
    }

    /// Mark the column as a MIMARKS field.
    pub fn with_mimarks(mut self, mimarks: bool) -> Self {
        self.mimarks = mimarks;
        self
    }

    /// Set the ontology.
    pub fn with_ontology(mut self, ontology: impl Into<String>) -> Self {
        self.ontology = Some(ontology.into());
        self
    }

    /// Mark the column as required by EBI.
    pub fn with_ebi_required(mut self, required: bool) -> Self {
        self.ebi_required = required;
        self
    }

    /// Mark the column as required by Qiita.
    pub fn with_qiita_required(mut self, required: bool) -> Self {
        self.qiita_required = required;
        self
    }

    /// Override the missing-value vocabulary.
    pub fn with_missing(mut self, missing: impl Into<MissingValues>) -> Self {
        self.missing = Some(missing.into());
        self
    }
}

/// Optional fields for a categorical column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoricalOptions {
    /// Low and high endpoints (defaults to the first and last of the order).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extremes: Option<Vec<Value>>,

    /// Categories seen this many times or fewer can be dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_cutoff: Option<usize>,

    /// Values that cannot be interpreted and can be dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambiguous_values: Option<Vec<Value>>,

    #[serde(flatten)]
    pub question: QuestionOptions,
}

impl CategoricalOptions {
    /// Create options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extremes.
    pub fn with_extremes<V: Into<Value>>(mut self, low: V, high: V) -> Self {
        self.extremes = Some(vec![low.into(), high.into()]);
        self
    }

    /// Set the frequency cutoff.
    pub fn with_frequency_cutoff(mut self, cutoff: usize) -> Self {
        self.frequency_cutoff = Some(cutoff);
        self
    }

    /// Set the ambiguous values.
    pub fn with_ambiguous_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.ambiguous_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set the shared question options.
    pub fn with_question(mut self, question: QuestionOptions) -> Self {
        self.question = question;
        self
    }
}

/// Optional fields for a yes/no column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolOptions {
    /// Literals used for true and false (defaults to `"true"`/`"false"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_format: Option<[Value; 2]>,

    /// A literal meaning "unsure", distinct from no answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambiguous_value: Option<Value>,

    #[serde(flatten)]
    pub question: QuestionOptions,
}

impl BoolOptions {
    /// Create options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the true and false literals.
    pub fn with_bool_format<V: Into<Value>>(mut self, true_value: V, false_value: V) -> Self {
        self.bool_format = Some([true_value.into(), false_value.into()]);
        self
    }

    /// Set the ambiguous literal.
    pub fn with_ambiguous_value(mut self, value: impl Into<Value>) -> Self {
        self.ambiguous_value = Some(value.into());
        self
    }

    /// Set the shared question options.
    pub fn with_question(mut self, question: QuestionOptions) -> Self {
        self.question = question;
        self
    }
}

/// Optional fields for a continuous column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContinuousOptions {
    /// Unit of measure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Inclusive `(lower, upper)` range of plausible values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<(f64, f64)>,

    /// Number of digits results should be rounded to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding: Option<u32>,

    #[serde(flatten)]
    pub question: QuestionOptions,
}

impl ContinuousOptions {
    /// Create options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Set the limits.
    pub fn with_limits(mut self, lower: f64, upper: f64) -> Self {
        self.limits = Some((lower, upper));
        self
    }

    /// Set the rounding.
    pub fn with_rounding(mut self, digits: u32) -> Self {
        self.rounding = Some(digits);
        self
    }

    /// Set the shared question options.
    pub fn with_question(mut self, question: QuestionOptions) -> Self {
        self.question = question;
        self
    }
}
