//! The normalized in-memory representation shared by both codecs.

use std::fmt;

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use thiserror::Error;

use crate::error::RangeError;
use crate::procid::ProcId;
use crate::structured_data::StructuredElement;
use crate::{pri, timestamp, Facility, Severity};

/// Which wire grammar a message belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RfcVersion {
    Rfc3164,
    Rfc5424,
}

/// A fully-resolved syslog message, produced by parsing or assembled with
/// [`MessageComponents::builder`]. Immutable once handed to a codec.
///
/// Facility and severity are always resolved here; the raw priority is
/// derived, never stored, so the `priority = facility*8 + severity`
/// invariant cannot drift.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageComponents {
    pub rfc_version: RfcVersion,
    pub facility: Facility,
    pub severity: Severity,
    /// Sub-second precision is retained only for RFC 5424; the builder
    /// truncates RFC 3164 timestamps to whole seconds.
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub hostname: Option<String>,
    /// RFC 3164 tag; empty for the degraded tagless form.
    pub tag: String,
    /// RFC 3164 process id.
    pub pid: Option<i32>,
    pub app_name: Option<String>,
    pub proc_id: Option<ProcId>,
    pub msg_id: Option<String>,
    pub structured_data: Vec<StructuredElement>,
    /// Free-form body; the only field that may contain spaces.
    pub message: String,
}

impl MessageComponents {
    pub fn builder(rfc_version: RfcVersion) -> ComponentsBuilder {
        ComponentsBuilder {
            rfc_version,
            priority: None,
            facility: None,
            severity: None,
            timestamp: None,
            hostname: None,
            tag: None,
            pid: None,
            app_name: None,
            proc_id: None,
            msg_id: None,
            structured_data: Vec::new(),
            message: String::new(),
        }
    }

    /// The combined `<PRI>` value.
    pub fn priority(&self) -> u8 {
        pri::compose(self.facility, self.severity)
    }
}

/// Rejected input to [`ComponentsBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error("facility and severity must be supplied together")]
    PartialPriority,
    #[error("{field} must be a non-empty token without spaces or control characters")]
    InvalidToken { field: &'static str },
    #[error("{field} exceeds {limit} characters")]
    TokenTooLong { field: &'static str, limit: usize },
}

/// Validating constructor for [`MessageComponents`].
///
/// Priority may be given either as the raw 0-191 value or as separate
/// facility and severity codes. Supplying both is accepted only when they
/// agree; supplying neither resolves to facility 4 / severity 2.
#[derive(Debug, Clone)]
pub struct ComponentsBuilder {
    rfc_version: RfcVersion,
    priority: Option<u16>,
    facility: Option<u8>,
    severity: Option<u8>,
    timestamp: Option<DateTime<FixedOffset>>,
    hostname: Option<String>,
    tag: Option<String>,
    pid: Option<i32>,
    app_name: Option<String>,
    proc_id: Option<ProcId>,
    msg_id: Option<String>,
    structured_data: Vec<StructuredElement>,
    message: String,
}

impl ComponentsBuilder {
    pub fn priority(mut self, priority: u16) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn facility(mut self, facility: u8) -> Self {
        self.facility = Some(facility);
        self
    }

    pub fn severity(mut self, severity: u8) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn pid(mut self, pid: i32) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn proc_id(mut self, proc_id: impl Into<ProcId>) -> Self {
        self.proc_id = Some(proc_id.into());
        self
    }

    pub fn msg_id(mut self, msg_id: impl Into<String>) -> Self {
        self.msg_id = Some(msg_id.into());
        self
    }

    pub fn structured_data(mut self, elements: Vec<StructuredElement>) -> Self {
        self.structured_data = elements;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn build(self) -> Result<MessageComponents, BuildError> {
        let (facility, severity) = match (self.priority, self.facility, self.severity) {
            (Some(priority), None, None) => pri::decode(priority)?,
            (None, Some(facility), Some(severity)) => (
                Facility::try_from(facility)?,
                Severity::try_from(severity)?,
            ),
            (Some(priority), Some(facility), Some(severity)) => {
                let f = Facility::try_from(facility)?;
                let s = Severity::try_from(severity)?;
                if priority != pri::compose(f, s) as u16 {
                    return Err(RangeError::PriorityMismatch {
                        priority,
                        facility,
                        severity,
                    }
                    .into());
                }
                (f, s)
            }
            (None, None, None) => (Facility::AUTH, Severity::CRIT),
            _ => return Err(BuildError::PartialPriority),
        };

        let hostname = self.hostname.unwrap_or_else(|| "localhost".to_string());
        validate_token(&hostname, "hostname")?;

        let tag = match self.rfc_version {
            RfcVersion::Rfc3164 => self.tag.unwrap_or_else(|| "app".to_string()),
            RfcVersion::Rfc5424 => self.tag.unwrap_or_default(),
        };
        if !tag.is_empty() {
            validate_tag(&tag)?;
        }

        if let Some(app_name) = &self.app_name {
            validate_ascii_token(app_name, "app_name", 48)?;
        }
        if let Some(ProcId::Name(name)) = &self.proc_id {
            validate_ascii_token(name, "proc_id", 32)?;
        }
        if let Some(msg_id) = &self.msg_id {
            validate_ascii_token(msg_id, "msg_id", 48)?;
        }

        let timestamp = self
            .timestamp
            .unwrap_or_else(|| Utc::now().with_timezone(&timestamp::utc_offset()));

        Ok(MessageComponents {
            rfc_version: self.rfc_version,
            facility,
            severity,
            timestamp: Some(truncate_for(self.rfc_version, timestamp)),
            hostname: Some(hostname),
            tag,
            pid: self.pid,
            app_name: self.app_name,
            proc_id: self.proc_id,
            msg_id: self.msg_id,
            structured_data: self.structured_data,
            message: self.message,
        })
    }
}

/// The wire formats cannot carry more than whole seconds (RFC 3164) or
/// microseconds (RFC 5424); drop the excess so generated output and a
/// re-parse of it agree with the stored value.
fn truncate_for(version: RfcVersion, ts: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let nanos = match version {
        RfcVersion::Rfc3164 => 0,
        RfcVersion::Rfc5424 => ts.nanosecond() - ts.nanosecond() % 1000,
    };
    ts.with_nanosecond(nanos).unwrap_or(ts)
}

fn validate_token(value: &str, field: &'static str) -> Result<(), BuildError> {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(BuildError::InvalidToken { field });
    }
    Ok(())
}

fn validate_tag(value: &str) -> Result<(), BuildError> {
    // ':' and '[' would be eaten as delimiters by the RFC 3164 grammar.
    if value
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || c == ':' || c == '[')
    {
        return Err(BuildError::InvalidToken { field: "tag" });
    }
    Ok(())
}

fn validate_ascii_token(value: &str, field: &'static str, limit: usize) -> Result<(), BuildError> {
    if value.is_empty() || !value.bytes().all(|b| (0x21..=0x7e).contains(&b)) {
        return Err(BuildError::InvalidToken { field });
    }
    if value.len() > limit {
        return Err(BuildError::TokenTooLong { field, limit });
    }
    Ok(())
}

/// An ordered sequence of key=value pairs joined into a single body line.
/// Kept separate from the parsed `message` field so a generated body is
/// never re-parsed out of the free-form text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KvBody {
    pairs: Vec<(String, String)>,
}

impl KvBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Join the pairs into `key=value key=value ...` in insertion order.
    pub fn join(&self) -> String {
        let mut out = String::new();
        for (idx, (key, value)) in self.pairs.iter().enumerate() {
            if idx > 0 {
                out.push(' ');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out
    }
}

impl fmt::Display for KvBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KvBody {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        KvBody {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_priority_is_decomposed() {
        let components = MessageComponents::builder(RfcVersion::Rfc3164)
            .priority(134)
            .build()
            .unwrap();
        assert_eq!(components.facility, Facility::LOCAL0);
        assert_eq!(components.severity, Severity::INFO);
        assert_eq!(components.priority(), 134);
    }

    #[test]
    fn consistent_dual_input_accepted() {
        let components = MessageComponents::builder(RfcVersion::Rfc5424)
            .priority(134)
            .facility(16)
            .severity(6)
            .build()
            .unwrap();
        assert_eq!(components.priority(), 134);
    }

    #[test]
    fn inconsistent_dual_input_rejected() {
        let err = MessageComponents::builder(RfcVersion::Rfc5424)
            .priority(134)
            .facility(16)
            .severity(5)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::Range(RangeError::PriorityMismatch {
                priority: 134,
                facility: 16,
                severity: 5,
            })
        );
    }

    #[test]
    fn lone_facility_rejected() {
        let err = MessageComponents::builder(RfcVersion::Rfc3164)
            .facility(16)
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::PartialPriority);
    }

    #[test]
    fn defaults_match_the_classic_34() {
        let components = MessageComponents::builder(RfcVersion::Rfc3164)
            .build()
            .unwrap();
        assert_eq!(components.priority(), 34);
        assert_eq!(components.hostname.as_deref(), Some("localhost"));
        assert_eq!(components.tag, "app");
        assert!(components.timestamp.is_some());
    }

    #[test]
    fn hostname_with_spaces_rejected() {
        let err = MessageComponents::builder(RfcVersion::Rfc3164)
            .hostname("two words")
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::InvalidToken { field: "hostname" });
    }

    #[test]
    fn tag_with_delimiters_rejected() {
        for tag in ["a:b", "a[b", "a b"] {
            let err = MessageComponents::builder(RfcVersion::Rfc3164)
                .tag(tag)
                .build()
                .unwrap_err();
            assert_eq!(err, BuildError::InvalidToken { field: "tag" }, "tag: {tag}");
        }
    }

    #[test]
    fn oversized_app_name_rejected() {
        let err = MessageComponents::builder(RfcVersion::Rfc5424)
            .app_name("a".repeat(49))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::TokenTooLong {
                field: "app_name",
                limit: 48,
            }
        );
    }

    #[test]
    fn rfc3164_timestamps_lose_subseconds() {
        let ts = crate::timestamp::parse_rfc3339("2025-08-31T21:30:39.123456Z").unwrap();
        let components = MessageComponents::builder(RfcVersion::Rfc3164)
            .timestamp(ts)
            .build()
            .unwrap();
        let kept = components.timestamp.unwrap();
        assert_eq!(kept.nanosecond(), 0);

        let components = MessageComponents::builder(RfcVersion::Rfc5424)
            .timestamp(ts)
            .build()
            .unwrap();
        let kept = components.timestamp.unwrap();
        assert_eq!(kept.nanosecond(), 123_456_000);
    }

    #[test]
    fn kv_body_joins_in_order() {
        let mut body = KvBody::new();
        body.push("if", "eth0");
        body.push("rx", "1024");
        body.push("tx", "512");
        assert_eq!(body.join(), "if=eth0 rx=1024 tx=512");

        let collected: KvBody = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(collected.to_string(), "a=1 b=2");
    }
}
