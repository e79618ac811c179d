//! Bidirectional codec for the two IETF syslog wire formats —
//! [RFC 3164](https://tools.ietf.org/html/rfc3164) BSD syslog and
//! [RFC 5424](https://tools.ietf.org/html/rfc5424) with structured data —
//! plus a cancellable engine that transmits encoded messages over UDP or
//! TCP with live progress accounting.
//!
//! Both codecs meet in [`MessageComponents`], the normalized value object:
//! parsing produces one, generation consumes one, and
//! [`MessageComponents::builder`] assembles one from explicit fields,
//! reconciling the raw-priority vs facility/severity dual representation.
//!
//! # Example
//!
//! ```
//! use syslogkit::{MessageComponents, RfcVersion};
//!
//! let components = MessageComponents::builder(RfcVersion::Rfc3164)
//!     .facility(16)
//!     .severity(6)
//!     .hostname("test-server")
//!     .tag("testapp")
//!     .pid(1234)
//!     .message("Basic RFC 3164 test message")
//!     .build()
//!     .unwrap();
//!
//! let wire = syslogkit::rfc3164::generate(&components);
//! assert!(wire.starts_with("<134>"));
//!
//! let parsed = syslogkit::rfc3164::parse_message(&wire).unwrap();
//! assert_eq!(parsed.components, components);
//! ```
//!
//! # Sending
//!
//! ```no_run
//! use std::time::Duration;
//! use syslogkit::transmit::{Repeat, TransmissionRequest, Transmitter, Transport};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let request = TransmissionRequest::new("127.0.0.1", 514, Transport::Udp)
//!     .with_repeat(Repeat::Count(10))
//!     .with_delay(Duration::from_millis(100));
//!
//! let result = Transmitter::new()
//!     .run(
//!         &request,
//!         b"<134>Aug 31 21:30:39 test-server testapp[1234]: hello",
//!         |progress| eprintln!("sent {} failed {}", progress.sent, progress.failed),
//!         &CancellationToken::new(),
//!     )
//!     .await?;
//! assert_eq!(result.sent, 10);
//! # Ok(())
//! # }
//! ```

mod components;
mod error;
mod facility;
mod procid;
mod severity;

pub mod pri;
pub mod rfc3164;
pub mod rfc5424;
pub mod structured_data;
pub mod timestamp;
pub mod transmit;

pub use components::{BuildError, ComponentsBuilder, KvBody, MessageComponents, RfcVersion};
pub use error::{ParseError, RangeError};
pub use facility::Facility;
pub use procid::ProcId;
pub use severity::Severity;
pub use structured_data::StructuredElement;
pub use transmit::{
    ConfigError, Outcome, Progress, Repeat, SendError, TransmissionRequest, TransmissionResult,
    Transmitter, Transport,
};

/// Generate the wire form for the components' declared RFC version.
pub fn generate_message(components: &MessageComponents) -> String {
    match components.rfc_version {
        RfcVersion::Rfc3164 => rfc3164::generate(components),
        RfcVersion::Rfc5424 => rfc5424::generate(components),
    }
}

/// Parse raw wire text against the caller-declared RFC version.
///
/// The RFC 3164 grammar tag is dropped here; callers that need to know
/// which 3164 grammar variant matched use [`rfc3164::parse_message`]
/// directly.
pub fn parse_message(input: &str, version: RfcVersion) -> Result<MessageComponents, ParseError> {
    match version {
        RfcVersion::Rfc3164 => rfc3164::parse_message(input).map(|parsed| parsed.components),
        RfcVersion::Rfc5424 => rfc5424::parse_message(input),
    }
}
