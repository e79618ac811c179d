//! Codec for [RFC 5424](https://tools.ietf.org/html/rfc5424) syslog
//! messages, structured data included.
//!
//! The header is seven space-delimited fields in fixed order; everything
//! after the structured data block is the free-form body, taken verbatim
//! (a leading BOM marker some producers emit is preserved, not stripped).

use chrono::Timelike;

use crate::components::{MessageComponents, RfcVersion};
use crate::error::ParseError;
use crate::procid::ProcId;
use crate::timestamp::{self, Precision};
use crate::{pri, structured_data};

/// Compose the wire form of `components`. Unset optional fields serialize
/// as the nil token `-`; the version is always the literal `1`.
pub fn generate(components: &MessageComponents) -> String {
    let ts = match &components.timestamp {
        Some(ts) => {
            let precision = if ts.nanosecond() == 0 {
                Precision::Seconds
            } else {
                Precision::Micros
            };
            timestamp::format_rfc3339(ts, precision)
        }
        None => "-".to_string(),
    };
    let proc_id = match &components.proc_id {
        Some(proc_id) => proc_id.to_string(),
        None => "-".to_string(),
    };

    let mut out = format!(
        "<{}>1 {} {} {} {} {} {}",
        components.priority(),
        ts,
        components.hostname.as_deref().unwrap_or("-"),
        components.app_name.as_deref().unwrap_or("-"),
        proc_id,
        components.msg_id.as_deref().unwrap_or("-"),
        structured_data::serialize(&components.structured_data),
    );
    if !components.message.is_empty() {
        out.push(' ');
        out.push_str(&components.message);
    }
    out
}

/// Parse a raw message into its components.
///
/// The header fields are required in strict left-to-right order; a version
/// token other than `1` is [`ParseError::UnsupportedVersion`], and running
/// out of header tokens before the structured data block is
/// [`ParseError::MissingField`] naming the first absent field.
pub fn parse_message(input: &str) -> Result<MessageComponents, ParseError> {
    let input = input.trim();

    let ((facility, severity), rest) = pri::parse_pri_block(input)?;

    let version_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if version_len == 0 {
        return Err(ParseError::MissingField("version"));
    }
    let version: u32 = rest[..version_len]
        .parse()
        .map_err(|_| ParseError::MissingField("version"))?;
    if version != 1 {
        return Err(ParseError::UnsupportedVersion(version));
    }
    let rest = rest[version_len..]
        .strip_prefix(' ')
        .ok_or(ParseError::MissingField("timestamp"))?;

    let (token, rest) = take_token(rest, "timestamp")?;
    let timestamp = match nil(token) {
        Some(token) => Some(timestamp::parse_rfc3339(token)?),
        None => None,
    };

    let (token, rest) = take_token(rest, "hostname")?;
    let hostname = nil(token).map(str::to_string);

    let (token, rest) = take_token(rest, "app-name")?;
    let app_name = nil(token).map(str::to_string);

    let (token, rest) = take_token(rest, "proc-id")?;
    let proc_id = nil(token).map(ProcId::from);

    let (token, rest) = take_token(rest, "msg-id")?;
    let msg_id = nil(token).map(str::to_string);

    let (structured_data, rest) = if rest.is_empty() {
        return Err(ParseError::MissingField("structured data"));
    } else if let Some(after) = rest.strip_prefix('-') {
        if !after.is_empty() && !after.starts_with(' ') {
            return Err(ParseError::StructuredData("expected '-' or '['"));
        }
        (Vec::new(), after)
    } else if rest.starts_with('[') {
        structured_data::parse_prefix(rest)?
    } else {
        return Err(ParseError::StructuredData("expected '-' or '['"));
    };

    // The body is whatever follows the single separator space, verbatim.
    let message = rest.strip_prefix(' ').unwrap_or(rest).to_string();

    Ok(MessageComponents {
        rfc_version: RfcVersion::Rfc5424,
        facility,
        severity,
        timestamp,
        hostname,
        tag: String::new(),
        pid: None,
        app_name,
        proc_id,
        msg_id,
        structured_data,
        message,
    })
}

fn take_token<'a>(
    input: &'a str,
    field: &'static str,
) -> Result<(&'a str, &'a str), ParseError> {
    if input.is_empty() {
        return Err(ParseError::MissingField(field));
    }
    match input.find(' ') {
        Some(0) => Err(ParseError::MissingField(field)),
        Some(idx) => Ok((&input[..idx], &input[idx + 1..])),
        None => Ok((input, "")),
    }
}

fn nil(token: &str) -> Option<&str> {
    if token == "-" {
        None
    } else {
        Some(token)
    }
}
