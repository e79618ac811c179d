use std::fmt;

use crate::error::RangeError;

/// Syslog severities from RFC 5424. 0 is an emergency, 7 is debug chatter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[allow(non_camel_case_types)]
pub enum Severity {
    EMERG = 0,
    ALERT = 1,
    CRIT = 2,
    ERR = 3,
    WARNING = 4,
    NOTICE = 5,
    INFO = 6,
    DEBUG = 7,
}

impl TryFrom<u8> for Severity {
    type Error = RangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let severity = match value {
            0 => Severity::EMERG,
            1 => Severity::ALERT,
            2 => Severity::CRIT,
            3 => Severity::ERR,
            4 => Severity::WARNING,
            5 => Severity::NOTICE,
            6 => Severity::INFO,
            7 => Severity::DEBUG,
            _ => return Err(RangeError::Severity(value)),
        };

        Ok(severity)
    }
}

impl Severity {
    /// The wire-format integer, 0-7.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Convert a syslog severity into a unique string representation
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::EMERG => "emerg",
            Severity::ALERT => "alert",
            Severity::CRIT => "crit",
            Severity::ERR => "err",
            Severity::WARNING => "warning",
            Severity::NOTICE => "notice",
            Severity::INFO => "info",
            Severity::DEBUG => "debug",
        }
    }

    /// Look a severity up by its lowercase keyword, e.g. `"warning"`.
    pub fn from_name(name: &str) -> Option<Self> {
        (0..8u8)
            .map(|code| Severity::try_from(code).expect("codes 0-7 are all valid"))
            .find(|severity| severity.as_str() == name)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
