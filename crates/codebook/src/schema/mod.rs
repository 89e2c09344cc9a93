//! Typed cell values and the metadata map they live in.

mod table;
mod types;

pub use table::MetadataMap;
pub use types::{DataType, Value};
