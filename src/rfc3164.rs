//! Codec for [RFC 3164](https://tools.ietf.org/html/rfc3164) BSD syslog
//! messages.
//!
//! The wire form is `<PRI>Mmm dd hh:mm:ss HOSTNAME TAG[PID]: MSG`. Plenty
//! of equipment omits the conventional `TAG:` section and emits `key=value`
//! telemetry straight after the hostname, so parsing knows a second,
//! relaxed grammar and reports which one matched.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::components::{MessageComponents, RfcVersion};
use crate::error::ParseError;
use crate::{pri, timestamp};

/// Which grammar variant matched during parsing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Grammar {
    /// `<PRI>TIMESTAMP HOSTNAME TAG[PID]: MSG`
    Tagged,
    /// `<PRI>TIMESTAMP HOSTNAME MSG` — tagless vendor-style input.
    Untagged,
}

/// A parse result carrying the matched grammar alongside the components.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedMessage {
    pub components: MessageComponents,
    pub grammar: Grammar,
}

/// Compose the wire form of `components`.
///
/// The `[PID]` bracket is omitted when there is no pid; an empty tag drops
/// the whole `TAG[PID]: ` section so tagless vendor messages survive a
/// parse/generate round trip.
pub fn generate(components: &MessageComponents) -> String {
    let ts = match &components.timestamp {
        Some(ts) => timestamp::format_bsd(ts),
        None => timestamp::format_bsd(&Utc::now().with_timezone(&timestamp::utc_offset())),
    };
    let hostname = components.hostname.as_deref().unwrap_or("localhost");

    let mut out = format!("<{}>{} {}", components.priority(), ts, hostname);
    if components.tag.is_empty() {
        if !components.message.is_empty() {
            out.push(' ');
            out.push_str(&components.message);
        }
    } else {
        out.push(' ');
        out.push_str(&components.tag);
        if let Some(pid) = components.pid {
            let _ = write!(out, "[{pid}]");
        }
        out.push_str(": ");
        out.push_str(&components.message);
    }
    out
}

/// Parse a raw message, inferring the year of its timestamp from the
/// current instant. See [`parse_message_at`] for the inference rule.
pub fn parse_message(input: &str) -> Result<ParsedMessage, ParseError> {
    parse_message_at(input, Utc::now())
}

/// Parse a raw message against an explicit reference instant.
///
/// The wire format carries no year; the timestamp codec assigns the
/// reference year unless that would place the message more than 48 hours
/// in the future, in which case the previous year is used. Callers that
/// need deterministic results (tests, replay of archived logs) pass the
/// instant themselves.
pub fn parse_message_at(
    input: &str,
    reference: DateTime<Utc>,
) -> Result<ParsedMessage, ParseError> {
    let input = input.trim();

    let ((facility, severity), rest) = pri::parse_pri_block(input)?;
    let (ts, rest) = timestamp::parse_bsd_prefix(rest, reference)?;
    let rest = rest
        .strip_prefix(' ')
        .ok_or(ParseError::MissingField("hostname"))?;

    let (hostname, rest) = match rest.find(' ') {
        Some(idx) if idx > 0 => (&rest[..idx], &rest[idx + 1..]),
        None if !rest.is_empty() => (rest, ""),
        _ => return Err(ParseError::MissingField("hostname")),
    };

    let (tag, pid, message, grammar) = match match_tagged(rest) {
        Some((tag, pid, message)) => (tag.to_string(), pid, message, Grammar::Tagged),
        None => (String::new(), None, rest, Grammar::Untagged),
    };

    Ok(ParsedMessage {
        components: MessageComponents {
            rfc_version: RfcVersion::Rfc3164,
            facility,
            severity,
            timestamp: Some(ts),
            hostname: Some(hostname.to_string()),
            tag,
            pid,
            app_name: None,
            proc_id: None,
            msg_id: None,
            structured_data: Vec::new(),
            message: message.to_string(),
        },
        grammar,
    })
}

/// Try the strict `TAG[PID]:` grammar. The tag is one or more characters
/// none of which is a space, colon or bracket; the pid bracket, when
/// present, must hold digits only.
fn match_tagged(input: &str) -> Option<(&str, Option<i32>, &str)> {
    let tag_end = input.find([' ', ':', '['])?;
    if tag_end == 0 {
        return None;
    }
    let tag = &input[..tag_end];
    let mut rest = &input[tag_end..];

    let mut pid = None;
    if let Some(after) = rest.strip_prefix('[') {
        let close = after.find(']')?;
        let digits = &after[..close];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        pid = Some(digits.parse().ok()?);
        rest = &after[close + 1..];
    }

    let rest = rest.strip_prefix(':')?;
    let message = rest.strip_prefix(' ').unwrap_or(rest);
    Some((tag, pid, message))
}
