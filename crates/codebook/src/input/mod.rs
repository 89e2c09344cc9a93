//! Loading and writing metadata maps as delimited text.

mod parser;
mod source;

pub use parser::{write_map, Parser, ParserConfig};
pub use source::{is_null_token, is_null_value, SourceMetadata, DEFAULT_NULL_TOKENS};
