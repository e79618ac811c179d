use thiserror::Error;

/// A numeric field outside its wire-format bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("facility {0} out of range (0-23)")]
    Facility(u8),
    #[error("severity {0} out of range (0-7)")]
    Severity(u8),
    #[error("priority {0} out of range (0-191)")]
    Priority(u16),
    #[error("priority {priority} does not match facility {facility} and severity {severity}")]
    PriorityMismatch {
        priority: u16,
        facility: u8,
        severity: u8,
    },
}

/// Why a raw message failed to parse.
///
/// Parsing never partially succeeds: either a full set of message
/// components is returned or one of these reasons is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("message does not start with a numeric <PRI> block")]
    MissingPriority,
    #[error("timestamp does not match any supported grammar")]
    MalformedTimestamp,
    #[error("missing required header field: {0}")]
    MissingField(&'static str),
    #[error("unsupported syslog protocol version {0}")]
    UnsupportedVersion(u32),
    #[error("malformed structured data: {0}")]
    StructuredData(&'static str),
    #[error(transparent)]
    Priority(#[from] RangeError),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}
