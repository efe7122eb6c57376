//! Purpose: Decode raw bytes into the generic JSON tree and describe decode failures.
//! Exports: `Decoder`, `SerdeJsonDecoder`, `SimdJsonDecoder`, `default_decoders`,
//!          `ensure_not_blank`, `ParseFailureCategory`, categorization and hint helpers.
//! Role: Parser boundary; the binder and the bench harness only see `Decoder`.
//! Invariants: Decoders know nothing about the document schema.
//! Invariants: Blank input is rejected as `EmptyInput` before any decoder runs.
//! Notes: simd-json needs a mutable buffer, so its decoder copies the input once per call.

use serde_json::Value;

use crate::core::error::{Error, ErrorKind};

/// A schema-agnostic JSON decoder producing the generic tree.
pub trait Decoder {
    /// Stable label used in bench reports.
    fn name(&self) -> &'static str;

    fn decode(&self, input: &[u8]) -> Result<Value, Error>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SerdeJsonDecoder;

impl Decoder for SerdeJsonDecoder {
    fn name(&self) -> &'static str {
        "serde_json"
    }

    fn decode(&self, input: &[u8]) -> Result<Value, Error> {
        ensure_not_blank(input)?;
        serde_json::from_slice(input).map_err(|err| serde_decode_error(err, input, self.name()))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SimdJsonDecoder;

impl Decoder for SimdJsonDecoder {
    fn name(&self) -> &'static str {
        "simd-json"
    }

    fn decode(&self, input: &[u8]) -> Result<Value, Error> {
        ensure_not_blank(input)?;
        let mut bytes = input.to_vec();
        simd_json::serde::from_slice(&mut bytes).map_err(|err| {
            let category = categorize_simd(&err);
            Error::new(ErrorKind::Decode)
                .with_message(err.to_string())
                .with_hint(hint_for(category, self.name()))
                .with_offset(err.index() as u64)
                .with_source(err)
        })
    }
}

/// Decoders compared by the bench breakdown, in report order.
pub fn default_decoders() -> Vec<Box<dyn Decoder>> {
    vec![Box::new(SerdeJsonDecoder), Box::new(SimdJsonDecoder)]
}

pub fn ensure_not_blank(input: &[u8]) -> Result<(), Error> {
    let blank = input
        .iter()
        .all(|byte| matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c'));
    if blank {
        return Err(Error::new(ErrorKind::EmptyInput)
            .with_message("input is empty or whitespace-only")
            .with_hint("Pass a who-uses-json-v1 document on stdin or via --input."));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseFailureCategory {
    Syntax,
    Eof,
    NumericRange,
    Utf8,
    DepthLimit,
    Unknown,
}

impl ParseFailureCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::NumericRange => "numeric-range",
            ParseFailureCategory::Utf8 => "utf8",
            ParseFailureCategory::DepthLimit => "depth-limit",
            ParseFailureCategory::Unknown => "unknown",
        }
    }
}

pub fn categorize_message(message: &str) -> ParseFailureCategory {
    let lower = message.to_ascii_lowercase();
    if lower.contains("recursion") || lower.contains("depth") {
        ParseFailureCategory::DepthLimit
    } else if lower.contains("out of range") || lower.contains("overflow") {
        ParseFailureCategory::NumericRange
    } else if lower.contains("utf8") || lower.contains("utf-8") || lower.contains("unicode") {
        ParseFailureCategory::Utf8
    } else if lower.contains("eof") || lower.contains("end of input") {
        ParseFailureCategory::Eof
    } else if lower.contains("expected") || lower.contains("trailing") || lower.contains("syntax")
    {
        ParseFailureCategory::Syntax
    } else {
        ParseFailureCategory::Unknown
    }
}

pub fn categorize_serde(err: &serde_json::Error) -> ParseFailureCategory {
    use serde_json::error::Category;
    match err.classify() {
        Category::Eof => ParseFailureCategory::Eof,
        Category::Syntax => match categorize_message(&err.to_string()) {
            ParseFailureCategory::Unknown | ParseFailureCategory::Eof => {
                ParseFailureCategory::Syntax
            }
            other => other,
        },
        Category::Io | Category::Data => categorize_message(&err.to_string()),
    }
}

pub fn categorize_simd(err: &simd_json::Error) -> ParseFailureCategory {
    categorize_message(&err.to_string())
}

pub fn hint_for(category: ParseFailureCategory, context: &str) -> String {
    format!("parse category: {}; context: {context}", category.as_str())
}

/// serde_json message without its trailing " at line L column C".
pub fn error_reason(err: &serde_json::Error) -> String {
    let text = err.to_string();
    if err.line() == 0 {
        return text;
    }
    let suffix = format!(" at line {} column {}", err.line(), err.column());
    match text.strip_suffix(&suffix) {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Byte offset of a 1-based line/column position inside `input`.
pub fn byte_offset(input: &[u8], line: usize, column: usize) -> u64 {
    let line_start = if line > 1 {
        input
            .iter()
            .enumerate()
            .filter(|(_, byte)| **byte == b'\n')
            .nth(line - 2)
            .map(|(idx, _)| idx + 1)
            .unwrap_or(input.len())
    } else {
        0
    };
    let offset = line_start + column.saturating_sub(1);
    offset.min(input.len()) as u64
}

pub(crate) fn serde_decode_error(err: serde_json::Error, input: &[u8], context: &str) -> Error {
    let category = categorize_serde(&err);
    let mut out = Error::new(ErrorKind::Decode)
        .with_message(error_reason(&err))
        .with_hint(hint_for(category, context));
    if err.line() > 0 {
        out = out
            .with_offset(byte_offset(input, err.line(), err.column()))
            .with_position(err.line(), err.column());
    }
    out.with_source(err)
}
