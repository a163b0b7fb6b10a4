//! Jot - JSON documents as mutable value trees
//!
//! A `Value` models the seven JSON kinds plus attached comments and source
//! offsets; the parser accepts a configurable lenient dialect and reports
//! structured errors; writers render compact or styled text under the same
//! configuration mechanism.
//!
//! # Example
//!
//! ```rust
//! use jot::parse;
//!
//! let root = parse(r#"{
//!     // comments and trailing commas are accepted by default
//!     "name": "jot",
//!     "stars": [1, 2, 3],
//! }"#).unwrap();
//!
//! assert_eq!(root["name"].as_str().unwrap(), "jot");
//! assert_eq!(root["stars"].len(), 3);
//! ```

mod lexer;
mod parser;
mod types;
mod writer;

pub mod builder;
pub mod convert;

pub use builder::{parse_from_read, write_string, Config, ParserBuilder, WriterBuilder};
pub use convert::FromValue;
pub use indexmap::IndexMap;
pub use lexer::{LexOptions, Lexer, Token, TokenKind};
pub use parser::{ParseError, ParseFailure, Parser, ParserOptions};
pub use types::{
    CommentPlacement, Entries, EntriesMut, Entry, EntryMut, Error, ObjectMap, Result, Value,
    ValueKind,
};
pub use writer::{FastWriter, PrecisionType, StreamWriter, StyledStreamWriter, StyledWriter};

/// Parse a document with the default (lenient) options.
pub fn parse(input: &str) -> std::result::Result<Value, ParseFailure> {
    Parser::new().parse(input)
}

impl std::str::FromStr for Value {
    type Err = ParseFailure;

    /// Builder-default parse, the inverse of the `Display` rendering.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ParserBuilder::new().build().parse(s)
    }
}
