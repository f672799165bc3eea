//! Resize request strings.
//!
//! Parses query strings like `?w=400&h=300&crop=1&anchor=tr&bgcolor=fff` into
//! [`Instructions`], which convert to a [`ResizeRequest`](crate::ResizeRequest)
//! and a [`Background`](crate::Background).
//!
//! # Example
//!
//! ```
//! use zenfit::{query, Anchor};
//!
//! let result = query::parse("w=200&h=100&crop=true&anchor=R");
//! assert!(result.warnings.is_empty());
//!
//! let request = result.instructions.to_request();
//! assert_eq!(request.anchor, Anchor::Right);
//!
//! let plan = request.resolve(100, 100).expect("valid plan");
//! assert_eq!(plan.src_x, 100);
//! ```

mod color;
pub mod instructions;
mod parse;

pub use instructions::Instructions;

use alloc::string::String;
use alloc::vec::Vec;

/// Result of parsing a request string.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed instructions.
    pub instructions: Instructions,
    /// Non-fatal parse warnings.
    pub warnings: Vec<ParseWarning>,
}

/// Non-fatal warning from request parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A key appeared more than once (last value wins).
    DuplicateKey { key: String, value: String },
    /// A key was not recognized.
    KeyNotRecognized { key: String, value: String },
    /// A key was recognized but its value could not be parsed.
    ValueInvalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Parse a request string (with or without leading `?`).
pub fn parse(query: &str) -> ParseResult {
    let (instructions, warnings) = parse::parse_query(query);
    ParseResult {
        instructions,
        warnings,
    }
}
