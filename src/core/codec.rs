//! core::codec
//!
//! Text representation of a [`Net`].
//!
//! The text form is pretty-printed JSON with a stable key order (the field
//! order of [`Net`]) and a configurable indent, so repeated serialization of
//! the same net yields byte-identical text. [`parse`] accepts any JSON that
//! matches the net shape, regardless of formatting.

use serde::Serialize;
use serde_json::error::Category;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

use super::net::Net;
use super::verify::{validate, SchemaError};

/// Default indent width for serialized nets.
pub const DEFAULT_INDENT: usize = 2;

/// Errors from reading net text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text is not well-formed JSON.
    #[error("malformed JSON at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// The text is JSON but does not have the net shape.
    #[error("not a net at line {line}, column {column}: {message}")]
    Shape {
        line: usize,
        column: usize,
        message: String,
    },
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        let line = err.line();
        let column = err.column();
        let message = err.to_string();
        match err.classify() {
            Category::Data => ParseError::Shape {
                line,
                column,
                message,
            },
            Category::Syntax | Category::Eof | Category::Io => ParseError::Syntax {
                line,
                column,
                message,
            },
        }
    }
}

/// Either failure mode of turning untrusted text into a canonical net.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Parse net text.
///
/// # Errors
///
/// `ParseError::Syntax` for malformed JSON, `ParseError::Shape` when a key is
/// missing or has the wrong type.
pub fn parse(text: &str) -> Result<Net, ParseError> {
    Ok(serde_json::from_str(text)?)
}

/// Parse and validate in one step.
///
/// This is the gate every externally sourced net passes before it may become
/// canonical.
pub fn parse_validated(text: &str) -> Result<Net, NetError> {
    let net = parse(text)?;
    validate(&net)?;
    Ok(net)
}

/// Serialize with the default indent.
pub fn serialize(net: &Net) -> String {
    serialize_with_indent(net, DEFAULT_INDENT)
}

/// Serialize with `indent` spaces per level.
pub fn serialize_with_indent(net: &Net, indent: usize) -> String {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    net.serialize(&mut ser)
        .expect("net contains only strings and sequences");
    String::from_utf8(buf).expect("serde_json emits UTF-8")
}

/// Compact single-line form, used on the wire to the local module.
pub fn serialize_compact(net: &Net) -> String {
    serde_json::to_string(net).expect("net contains only strings and sequences")
}
