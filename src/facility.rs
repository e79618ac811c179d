use std::fmt;

use crate::error::RangeError;

/// Syslog facilities. Taken from RFC 5424, but some platforms mix these
/// around. Names are from Linux.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Ord, PartialOrd)]
#[allow(non_camel_case_types)]
pub enum Facility {
    KERN = 0,
    USER = 1,
    MAIL = 2,
    DAEMON = 3,
    AUTH = 4,
    SYSLOG = 5,
    LPR = 6,
    NEWS = 7,
    UUCP = 8,
    CRON = 9,
    AUTHPRIV = 10,
    FTP = 11,
    NTP = 12,
    AUDIT = 13,
    ALERT = 14,
    CLOCKD = 15,
    LOCAL0 = 16,
    LOCAL1 = 17,
    LOCAL2 = 18,
    LOCAL3 = 19,
    LOCAL4 = 20,
    LOCAL5 = 21,
    LOCAL6 = 22,
    LOCAL7 = 23,
}

impl TryFrom<u8> for Facility {
    type Error = RangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use Facility::*;

        const TABLE: [Facility; 24] = [
            KERN, USER, MAIL, DAEMON, AUTH, SYSLOG, LPR, NEWS, UUCP, CRON, AUTHPRIV, FTP, NTP,
            AUDIT, ALERT, CLOCKD, LOCAL0, LOCAL1, LOCAL2, LOCAL3, LOCAL4, LOCAL5, LOCAL6, LOCAL7,
        ];

        TABLE
            .get(value as usize)
            .copied()
            .ok_or(RangeError::Facility(value))
    }
}

impl Facility {
    /// The wire-format integer, 0-23.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Convert a syslog facility into a unique string representation
    pub fn as_str(self) -> &'static str {
        match self {
            Facility::KERN => "kern",
            Facility::USER => "user",
            Facility::MAIL => "mail",
            Facility::DAEMON => "daemon",
            Facility::AUTH => "auth",
            Facility::SYSLOG => "syslog",
            Facility::LPR => "lpr",
            Facility::NEWS => "news",
            Facility::UUCP => "uucp",
            Facility::CRON => "cron",
            Facility::AUTHPRIV => "authpriv",
            Facility::FTP => "ftp",
            Facility::NTP => "ntp",
            Facility::AUDIT => "audit",
            Facility::ALERT => "alert",
            Facility::CLOCKD => "clockd",
            Facility::LOCAL0 => "local0",
            Facility::LOCAL1 => "local1",
            Facility::LOCAL2 => "local2",
            Facility::LOCAL3 => "local3",
            Facility::LOCAL4 => "local4",
            Facility::LOCAL5 => "local5",
            Facility::LOCAL6 => "local6",
            Facility::LOCAL7 => "local7",
        }
    }

    /// Look a facility up by its lowercase keyword, e.g. `"local0"`.
    pub fn from_name(name: &str) -> Option<Self> {
        (0..24u8)
            .map(|code| Facility::try_from(code).expect("codes 0-23 are all valid"))
            .find(|facility| facility.as_str() == name)
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Facility;
    use crate::error::RangeError;

    #[test]
    fn wire_codes_round_trip() {
        for code in 0..24u8 {
            let facility = Facility::try_from(code).unwrap();
            assert_eq!(facility.code(), code);
        }
    }

    #[test]
    fn out_of_range_rejected() {
        assert_eq!(Facility::try_from(24), Err(RangeError::Facility(24)));
        assert_eq!(Facility::try_from(255), Err(RangeError::Facility(255)));
    }

    #[test]
    fn names() {
        assert_eq!(Facility::KERN.as_str(), "kern");
        assert_eq!(Facility::LOCAL7.as_str(), "local7");
        assert_eq!(Facility::from_name("authpriv"), Some(Facility::AUTHPRIV));
        assert_eq!(Facility::from_name("nope"), None);
    }
}
