//! The two syslog timestamp grammars.
//!
//! RFC 3164 carries `Mon dd hh:mm:ss` with no year and no zone; RFC 5424
//! carries an ISO-8601 timestamp with a mandatory `T` separator and a
//! mandatory `Z`/`±hh:mm` offset. Both sides are hand-scanned field by
//! field rather than regex-matched, which keeps error reporting exact and
//! the hot path allocation-free.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};

use crate::error::ParseError;

pub(crate) const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// How far ahead of the reference instant a year-less BSD timestamp may
/// land before it is assumed to belong to the previous year. The wire
/// format is inherently ambiguous around New Year; this skew is a policy
/// choice, not an RFC rule.
const FORWARD_SKEW_HOURS: i64 = 48;

/// Output precision for [`format_rfc3339`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Seconds,
    Micros,
}

/// Parse a full `Mon dd hh:mm:ss` timestamp.
///
/// `reference` supplies the year the wire format omits: the candidate gets
/// the reference year unless that would put it more than 48 hours in the
/// future, in which case the previous year is used.
pub fn parse_bsd(input: &str, reference: DateTime<Utc>) -> Result<DateTime<FixedOffset>, ParseError> {
    let (ts, rest) = parse_bsd_prefix(input, reference)?;
    if rest.is_empty() {
        Ok(ts)
    } else {
        Err(ParseError::MalformedTimestamp)
    }
}

/// Like [`parse_bsd`] but stops after the seconds field and returns the
/// unconsumed remainder, for use inside a message parser.
pub(crate) fn parse_bsd_prefix(
    input: &str,
    reference: DateTime<Utc>,
) -> Result<(DateTime<FixedOffset>, &str), ParseError> {
    let abbrev = input.get(..3).ok_or(ParseError::MalformedTimestamp)?;
    let month = MONTHS
        .iter()
        .position(|m| *m == abbrev)
        .ok_or(ParseError::MalformedTimestamp)? as u32
        + 1;

    // Day is 1-2 digits, space-padded on the wire but accepted unpadded.
    let rest = skip_spaces(&input[3..])?;
    let b = rest.as_bytes();
    let mut day = digit(b, 0)?;
    let mut len = 1;
    if let Some(c) = b.get(1) {
        if c.is_ascii_digit() {
            day = day * 10 + (c - b'0') as u32;
            len = 2;
        }
    }
    let rest = skip_spaces(&rest[len..])?;

    let b = rest.as_bytes();
    let hour = two_digits(b, 0)?;
    if b.get(2) != Some(&b':') {
        return Err(ParseError::MalformedTimestamp);
    }
    let minute = two_digits(b, 3)?;
    if b.get(5) != Some(&b':') {
        return Err(ParseError::MalformedTimestamp);
    }
    let second = two_digits(b, 6)?;
    let rest = &rest[8..];

    // Year inference. An impossible date in the reference year (Feb 29)
    // also falls through to the previous year.
    let ts = match wall_clock(reference.year(), month, day, hour, minute, second) {
        Some(ts) if ts.signed_duration_since(reference) <= Duration::hours(FORWARD_SKEW_HOURS) => {
            ts
        }
        _ => wall_clock(reference.year() - 1, month, day, hour, minute, second)
            .ok_or(ParseError::MalformedTimestamp)?,
    };

    Ok((ts, rest))
}

/// Format a timestamp in the BSD grammar, truncating sub-second precision.
/// Days 1-9 are space-padded, never zero-padded.
pub fn format_bsd(ts: &DateTime<FixedOffset>) -> String {
    format!(
        "{} {:>2} {:02}:{:02}:{:02}",
        MONTHS[ts.month0() as usize],
        ts.day(),
        ts.hour(),
        ts.minute(),
        ts.second(),
    )
}

/// Parse an RFC 5424 timestamp: full date, `T`, full time, optional
/// 1-6 digit fraction, mandatory `Z` or `±hh:mm` offset. Anything else,
/// including a space separator or a missing offset, is rejected.
pub fn parse_rfc3339(input: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let b = input.as_bytes();

    let year = (digit(b, 0)? * 1000 + digit(b, 1)? * 100 + digit(b, 2)? * 10 + digit(b, 3)?) as i32;
    if b.get(4) != Some(&b'-') {
        return Err(ParseError::MalformedTimestamp);
    }
    let month = two_digits(b, 5)?;
    if b.get(7) != Some(&b'-') {
        return Err(ParseError::MalformedTimestamp);
    }
    let day = two_digits(b, 8)?;

    if b.get(10) != Some(&b'T') {
        return Err(ParseError::MalformedTimestamp);
    }

    let hour = two_digits(b, 11)?;
    if b.get(13) != Some(&b':') {
        return Err(ParseError::MalformedTimestamp);
    }
    let minute = two_digits(b, 14)?;
    if b.get(16) != Some(&b':') {
        return Err(ParseError::MalformedTimestamp);
    }
    let second = two_digits(b, 17)?;

    let mut idx = 19;
    let mut micros = 0u32;
    if b.get(idx).copied() == Some(b'.') {
        idx += 1;
        let mut count = 0u32;
        while let Some(c) = b.get(idx) {
            if !c.is_ascii_digit() {
                break;
            }
            count += 1;
            if count > 6 {
                return Err(ParseError::MalformedTimestamp);
            }
            micros = micros * 10 + (c - b'0') as u32;
            idx += 1;
        }
        if count == 0 {
            return Err(ParseError::MalformedTimestamp);
        }
        micros *= 10u32.pow(6 - count);
    }

    let offset_secs = match b.get(idx).copied() {
        Some(b'Z') => {
            idx += 1;
            0
        }
        Some(sign @ (b'+' | b'-')) => {
            let h = two_digits(b, idx + 1)? as i32;
            if b.get(idx + 3) != Some(&b':') {
                return Err(ParseError::MalformedTimestamp);
            }
            let m = two_digits(b, idx + 4)? as i32;
            if m >= 60 {
                return Err(ParseError::MalformedTimestamp);
            }
            idx += 6;
            let magnitude = h * 3600 + m * 60;
            if sign == b'-' {
                -magnitude
            } else {
                magnitude
            }
        }
        _ => return Err(ParseError::MalformedTimestamp),
    };

    if idx != b.len() {
        return Err(ParseError::MalformedTimestamp);
    }

    let offset = FixedOffset::east_opt(offset_secs).ok_or(ParseError::MalformedTimestamp)?;
    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_micro_opt(hour, minute, second, micros))
        .ok_or(ParseError::MalformedTimestamp)?;

    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or(ParseError::MalformedTimestamp)
}

/// Format a timestamp for RFC 5424 output. Always UTC with an explicit `Z`.
pub fn format_rfc3339(ts: &DateTime<FixedOffset>, precision: Precision) -> String {
    let utc = ts.with_timezone(&Utc);
    match precision {
        Precision::Seconds => utc.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        Precision::Micros => utc.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
    }
}

fn wall_clock(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    utc_offset().from_local_datetime(&naive).single()
}

pub(crate) fn utc_offset() -> FixedOffset {
    FixedOffset::east_opt(0).expect("zero offset is always valid")
}

/// Consume a mandatory run of one or more ASCII spaces, returning the
/// remainder. BSD fields are space-separated, so a missing separator is a
/// malformed timestamp.
fn skip_spaces(s: &str) -> Result<&str, ParseError> {
    let trimmed = s.trim_start_matches(' ');
    if trimmed.len() == s.len() {
        return Err(ParseError::MalformedTimestamp);
    }
    Ok(trimmed)
}

fn digit(b: &[u8], idx: usize) -> Result<u32, ParseError> {
    match b.get(idx) {
        Some(c) if c.is_ascii_digit() => Ok((c - b'0') as u32),
        _ => Err(ParseError::MalformedTimestamp),
    }
}

fn two_digits(b: &[u8], idx: usize) -> Result<u32, ParseError> {
    Ok(digit(b, idx)? * 10 + digit(b, idx + 1)?)
}
