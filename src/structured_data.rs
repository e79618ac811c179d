//! RFC 5424 structured data: `[SD-ID (SP NAME="VALUE")*]` blocks.
//!
//! Param values are held un-escaped in memory; the escape prefixes for
//! `"`, `\` and `]` are stripped on parse and re-applied on serialization.

use std::fmt;
use std::fmt::Write as _;

use crate::error::ParseError;

/// One bracketed SD-ELEMENT: an SD-ID plus its params in wire order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuredElement {
    pub id: String,
    pub params: Vec<(String, String)>,
}

impl StructuredElement {
    pub fn new(id: impl Into<String>) -> Self {
        StructuredElement {
            id: id.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }
}

impl fmt::Display for StructuredElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.id)?;
        for (name, value) in &self.params {
            write!(f, " {}=\"{}\"", name, escape(value))?;
        }
        f.write_str("]")
    }
}

/// Serialize a structured data sequence; the empty sequence is the nil
/// token `-`, elements are adjoined with no separator.
pub fn serialize(elements: &[StructuredElement]) -> String {
    if elements.is_empty() {
        return "-".to_string();
    }
    let mut out = String::new();
    for element in elements {
        let _ = write!(out, "{element}");
    }
    out
}

/// Parse a complete structured data field: either the nil token `-` or one
/// or more adjoined elements with nothing left over.
pub fn parse(input: &str) -> Result<Vec<StructuredElement>, ParseError> {
    if input == "-" {
        return Ok(Vec::new());
    }
    let (elements, rest) = parse_prefix(input)?;
    if rest.is_empty() {
        Ok(elements)
    } else {
        Err(ParseError::StructuredData("trailing input after final ']'"))
    }
}

/// Parse adjoined `[..]` blocks from the front of `input`, stopping at the
/// end of input or at the space that starts the free-form message body.
pub(crate) fn parse_prefix(input: &str) -> Result<(Vec<StructuredElement>, &str), ParseError> {
    let mut elements = Vec::new();
    let mut rest = input;

    loop {
        let (element, after) = parse_element(rest)?;
        elements.push(element);
        rest = after;

        if rest.is_empty() || rest.starts_with(' ') {
            return Ok((elements, rest));
        }
    }
}

// example: [exampleSDID@32473 iut="3" eventSource="Application" eventID="1011"]
fn parse_element(input: &str) -> Result<(StructuredElement, &str), ParseError> {
    let rest = input
        .strip_prefix('[')
        .ok_or(ParseError::StructuredData("expected '['"))?;

    let id_end = rest
        .find([' ', ']'])
        .ok_or(ParseError::StructuredData("unterminated element"))?;
    let id = &rest[..id_end];
    let mut rest = &rest[id_end..];

    let mut params = Vec::new();
    loop {
        if let Some(after) = rest.strip_prefix(']') {
            return Ok((
                StructuredElement {
                    id: id.to_string(),
                    params,
                },
                after,
            ));
        }

        rest = rest
            .strip_prefix(' ')
            .ok_or(ParseError::StructuredData("expected ' ' or ']'"))?;

        let eq = rest
            .find('=')
            .ok_or(ParseError::StructuredData("expected '=' after param name"))?;
        let name = &rest[..eq];
        if name.contains([']', '"', ' ']) {
            return Err(ParseError::StructuredData("invalid param name"));
        }

        let (value, after) = parse_quoted_value(&rest[eq + 1..])?;
        params.push((name.to_string(), value));
        rest = after;
    }
}

/// Scan a double-quoted param value, un-escaping as we go. Brackets inside
/// the quotes do not terminate the element.
fn parse_quoted_value(input: &str) -> Result<(String, &str), ParseError> {
    let rest = input
        .strip_prefix('"')
        .ok_or(ParseError::StructuredData("param value must be quoted"))?;

    let mut value = String::new();
    let mut escaped = false;
    for (idx, ch) in rest.char_indices() {
        if escaped {
            escaped = false;
            match ch {
                '"' | '\\' | ']' => value.push(ch),
                // Unknown escapes pass through untouched.
                other => {
                    value.push('\\');
                    value.push(other);
                }
            }
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => return Ok((value, &rest[idx + 1..])),
            _ => value.push(ch),
        }
    }

    Err(ParseError::StructuredData("unterminated param value"))
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '"' | '\\' | ']') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
