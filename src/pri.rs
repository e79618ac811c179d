//! Codec for the `<PRI>` field that leads every syslog message.
//!
//! The priority value packs the facility into the upper bits and the
//! severity into the lower three: `priority = facility * 8 + severity`.

use crate::error::{ParseError, RangeError};
use crate::{Facility, Severity};

/// Combine raw facility and severity codes into a priority value.
pub fn encode(facility: u8, severity: u8) -> Result<u8, RangeError> {
    let facility = Facility::try_from(facility)?;
    let severity = Severity::try_from(severity)?;
    Ok(compose(facility, severity))
}

/// Split a priority value into its facility and severity.
pub fn decode(priority: u16) -> Result<(Facility, Severity), RangeError> {
    if priority > 191 {
        return Err(RangeError::Priority(priority));
    }
    let facility = Facility::try_from((priority / 8) as u8)?;
    let severity = Severity::try_from((priority % 8) as u8)?;
    Ok((facility, severity))
}

/// Infallible form of [`encode`] for already-typed values.
pub fn compose(facility: Facility, severity: Severity) -> u8 {
    facility.code() * 8 + severity.code()
}

/// Consume a leading `<PRI>` block, returning the decoded pair and the
/// remaining input. A missing or non-numeric block is [`ParseError::MissingPriority`];
/// a numeric but out-of-range value surfaces the underlying [`RangeError`].
pub(crate) fn parse_pri_block(input: &str) -> Result<((Facility, Severity), &str), ParseError> {
    let rest = input.strip_prefix('<').ok_or(ParseError::MissingPriority)?;
    let end = rest.find('>').ok_or(ParseError::MissingPriority)?;
    let digits = &rest[..end];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::MissingPriority);
    }
    let prival: u16 = digits.parse().map_err(|_| ParseError::MissingPriority)?;
    Ok((decode(prival)?, &rest[end + 1..]))
}
