//! Codebook: column contracts, cleaning and provenance for metadata maps.
//!
//! A metadata map is a table with one row per entity and one column per
//! attribute. Each column is described by a contract that knows its type and
//! domain, checks the column against them, cleans it in place, and records
//! every change it makes.
//!
//! # Core Principles
//!
//! - **Declared contracts**: each column states what its values should be
//! - **In-place cleaning**: the caller's map is changed directly
//! - **Full provenance**: every check and change is logged
//!
//! # Example
//!
//! ```
//! use codebook::{Categorical, DataType, MetadataMap, Value};
//!
//! let mut map = MetadataMap::new("player", ["Bitty", "Ransom", "Holster"])
//!     .with_column("position", ["Striker", "D-man", "D-man"])
//!     .unwrap();
//!
//! let mut position = Categorical::new(
//!     "position",
//!     "Position on the ice",
//!     DataType::Str,
//!     ["Striker", "D-man", "Goalie"],
//! )
//! .unwrap();
//! position.convert_to_numeric(&mut map).unwrap();
//!
//! assert_eq!(map.column("position").unwrap(), &[Value::Int(0), Value::Int(1), Value::Int(1)]);
//! println!("{}", position.question().write_providence().to_tsv_string().unwrap());
//! ```

pub mod dictionary;
pub mod error;
pub mod input;
pub mod provenance;
pub mod question;
pub mod schema;

pub use dictionary::{Column, ColumnEntry, DataDictionary, Session, Step};
pub use error::{CodebookError, Result};
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use provenance::{ProvenanceLog, ProvenanceRecord, ProvenanceTable, TransformType};
pub use question::{
    Bool, BoolOptions, Categorical, CategoricalOptions, ColumnContract, Continuous,
    ContinuousOptions, Question, QuestionKind, QuestionOptions,
};
pub use schema::{DataType, MetadataMap, Value};
