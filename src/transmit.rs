//! Repeated, cancellable transmission of encoded messages over UDP or TCP.
//!
//! A [`Transmitter`] drives one request at a time: validate, resolve the
//! target once, then send the payload in a loop, reporting cumulative
//! counts through a progress callback after every attempt. Each TCP
//! attempt opens a fresh connection and closes it after the write, so
//! per-attempt failures stay independent. Cancellation is cooperative: the
//! token is observed at the top of every iteration, right after every
//! send, and while waiting out the inter-send delay.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{lookup_host, TcpStream, UdpSocket};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// Upper bound on a bounded repeat count.
pub const MAX_REPEAT_COUNT: u32 = 10_000;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Which transport carries the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Udp,
    Tcp,
}

impl Transport {
    pub fn as_str(self) -> &'static str {
        match self {
            Transport::Udp => "udp",
            Transport::Tcp => "tcp",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often to send: a bounded count or until cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Count(u32),
    Unlimited,
}

/// One transmission job. Lives for the duration of a single [`Transmitter::run`].
#[derive(Debug, Clone)]
pub struct TransmissionRequest {
    pub host: String,
    pub port: u16,
    pub transport: Transport,
    pub repeat: Repeat,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl TransmissionRequest {
    /// A single send to `host:port`.
    pub fn new(host: impl Into<String>, port: u16, transport: Transport) -> Self {
        TransmissionRequest {
            host: host.into(),
            port,
            transport,
            repeat: Repeat::Count(1),
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Checked synchronously before any socket is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if let Repeat::Count(count) = self.repeat {
            if count == 0 || count > MAX_REPEAT_COUNT {
                return Err(ConfigError::InvalidRepeatCount(count));
            }
        }
        Ok(())
    }
}

/// Invalid request parameters, rejected before the loop starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("target host must not be empty")]
    EmptyHost,
    #[error("target port must be in 1-65535")]
    InvalidPort,
    #[error("repeat count {0} out of range (1-{MAX_REPEAT_COUNT})")]
    InvalidRepeatCount(u32),
}

/// A single send attempt gone wrong. Recorded and counted; never aborts
/// the loop once it is running.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("failed to resolve {target}: {source}")]
    Resolve {
        target: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{target} did not resolve to any address")]
    NoAddress { target: String },
    #[error("connection failed to {target}: {source}")]
    Connect {
        target: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("send failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("send timed out")]
    Timeout,
}

/// How a request ended. Terminal; a new request starts a fresh loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The configured number of attempts ran to the end.
    Completed,
    /// The cancellation token fired mid-run.
    Cancelled,
    /// The target never resolved; no attempt was made.
    Failed,
}

/// Cumulative counters, passed to the progress callback after every
/// attempt in strict send order.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub sent: u64,
    pub failed: u64,
    pub last_error: Option<String>,
}

/// Final accounting for one request.
#[derive(Debug, Clone)]
pub struct TransmissionResult {
    pub sent: u64,
    pub failed: u64,
    pub last_error: Option<String>,
    pub outcome: Outcome,
}

/// The send engine. Holds only per-attempt timeouts, so one instance can
/// serve any number of concurrent `run` calls; every call owns its own
/// socket, counters and cancellation token.
#[derive(Debug, Clone)]
pub struct Transmitter {
    connect_timeout: Duration,
    send_timeout: Duration,
}

impl Default for Transmitter {
    fn default() -> Self {
        Transmitter {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }
}

impl Transmitter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Run one request to its terminal state.
    ///
    /// Returns `Err` only for an invalid request, before any I/O. A target
    /// that fails to resolve yields `Ok` with [`Outcome::Failed`] and zero
    /// attempts; per-attempt socket errors increment `failed` and the loop
    /// carries on. `on_progress` fires once per attempt with cumulative
    /// counts, in send order.
    pub async fn run<F>(
        &self,
        request: &TransmissionRequest,
        payload: &[u8],
        mut on_progress: F,
        cancel: &CancellationToken,
    ) -> Result<TransmissionResult, ConfigError>
    where
        F: FnMut(&Progress),
    {
        request.validate()?;

        let target = format!("{}:{}", request.host, request.port);
        let addr = match resolve(&target).await {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(target = %target, error = %err, "target resolution failed");
                return Ok(TransmissionResult {
                    sent: 0,
                    failed: 0,
                    last_error: Some(err.to_string()),
                    outcome: Outcome::Failed,
                });
            }
        };

        tracing::debug!(
            target = %addr,
            transport = %request.transport,
            repeat = ?request.repeat,
            delay_ms = request.delay.as_millis() as u64,
            "transmission starting"
        );

        let mut progress = Progress::default();
        let mut remaining = match request.repeat {
            Repeat::Count(count) => Some(count),
            Repeat::Unlimited => None,
        };

        let outcome = loop {
            if cancel.is_cancelled() {
                break Outcome::Cancelled;
            }

            match self.send_once(addr, payload, request.transport).await {
                Ok(()) => progress.sent += 1,
                Err(err) => {
                    progress.failed += 1;
                    progress.last_error = Some(err.to_string());
                    tracing::debug!(target = %addr, error = %err, "send attempt failed");
                }
            }
            on_progress(&progress);

            if cancel.is_cancelled() {
                break Outcome::Cancelled;
            }

            if let Some(count) = remaining.as_mut() {
                *count -= 1;
                if *count == 0 {
                    break Outcome::Completed;
                }
            }

            if !request.delay.is_zero() {
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => break Outcome::Cancelled,
                    _ = tokio::time::sleep(request.delay) => {}
                }
            }
        };

        tracing::info!(
            target = %addr,
            sent = progress.sent,
            failed = progress.failed,
            outcome = ?outcome,
            "transmission finished"
        );

        Ok(TransmissionResult {
            sent: progress.sent,
            failed: progress.failed,
            last_error: progress.last_error,
            outcome,
        })
    }

    /// One attempt: a single datagram for UDP, or a fresh
    /// connect-write-close for TCP.
    pub async fn send_once(
        &self,
        addr: SocketAddr,
        payload: &[u8],
        transport: Transport,
    ) -> Result<(), SendError> {
        match transport {
            Transport::Udp => self.send_udp(addr, payload).await,
            Transport::Tcp => self.send_tcp(addr, payload).await,
        }
    }

    async fn send_udp(&self, addr: SocketAddr, payload: &[u8]) -> Result<(), SendError> {
        let bind_addr: SocketAddr = if addr.is_ipv4() {
            "0.0.0.0:0".parse().expect("wildcard v4 address parses")
        } else {
            "[::]:0".parse().expect("wildcard v6 address parses")
        };
        let socket = UdpSocket::bind(bind_addr).await?;

        match timeout(self.send_timeout, socket.send_to(payload, addr)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(err)) => Err(SendError::Io(err)),
            Err(_) => Err(SendError::Timeout),
        }
    }

    async fn send_tcp(&self, addr: SocketAddr, payload: &[u8]) -> Result<(), SendError> {
        let mut stream = match timeout(self.connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => {
                return Err(SendError::Connect {
                    target: addr,
                    source: err,
                })
            }
            Err(_) => return Err(SendError::Timeout),
        };

        let write = async {
            stream.write_all(payload).await?;
            stream.flush().await?;
            stream.shutdown().await?;
            Ok::<(), std::io::Error>(())
        };
        match timeout(self.send_timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(SendError::Io(err)),
            Err(_) => Err(SendError::Timeout),
        }
    }
}

async fn resolve(target: &str) -> Result<SocketAddr, SendError> {
    let mut addrs = lookup_host(target).await.map_err(|err| SendError::Resolve {
        target: target.to_string(),
        source: err,
    })?;
    addrs.next().ok_or_else(|| SendError::NoAddress {
        target: target.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_catches_bad_requests() {
        let ok = TransmissionRequest::new("127.0.0.1", 514, Transport::Udp);
        assert_eq!(ok.validate(), Ok(()));

        let empty_host = TransmissionRequest::new("", 514, Transport::Udp);
        assert_eq!(empty_host.validate(), Err(ConfigError::EmptyHost));

        let zero_port = TransmissionRequest::new("127.0.0.1", 0, Transport::Tcp);
        assert_eq!(zero_port.validate(), Err(ConfigError::InvalidPort));

        let zero_count = TransmissionRequest::new("127.0.0.1", 514, Transport::Udp)
            .with_repeat(Repeat::Count(0));
        assert_eq!(
            zero_count.validate(),
            Err(ConfigError::InvalidRepeatCount(0))
        );

        let too_many = TransmissionRequest::new("127.0.0.1", 514, Transport::Udp)
            .with_repeat(Repeat::Count(MAX_REPEAT_COUNT + 1));
        assert_eq!(
            too_many.validate(),
            Err(ConfigError::InvalidRepeatCount(MAX_REPEAT_COUNT + 1))
        );

        let unlimited = TransmissionRequest::new("127.0.0.1", 514, Transport::Udp)
            .with_repeat(Repeat::Unlimited);
        assert_eq!(unlimited.validate(), Ok(()));
    }
}
