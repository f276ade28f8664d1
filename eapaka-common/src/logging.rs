//! Logging infrastructure for eapaka
//!
//! This module provides configurable logging using the `tracing` crate and
//! EAP frame logging with hex payloads for debugging. Key material must never
//! be passed to these helpers.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Verbosity of the EAP-AKA peer's log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Frame hex dumps
    Trace,
    /// Decoded frames and key derivation steps
    Debug,
    #[default]
    Info,
    /// Sync failures, rejected AUTN, bad input
    Warn,
    Error,
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Directive accepted by `EnvFilter`
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("warning") {
            return Ok(LogLevel::Warn);
        }
        LogLevel::ALL
            .into_iter()
            .find(|level| s.eq_ignore_ascii_case(level.as_str()))
            .ok_or_else(|| format!("unknown log level: {s}"))
    }
}

/// Install the global subscriber at `level`
///
/// `RUST_LOG` takes precedence when set. Output goes to stderr so stdout
/// stays reserved for command results. Calling it twice is a no-op.
pub fn init_logging(level: LogLevel) {
    init_logging_with_filter(level.as_str());
}

/// Install the global subscriber with an `EnvFilter` directive string
///
/// ```no_run
/// use eapaka_common::logging::init_logging_with_filter;
///
/// init_logging_with_filter("info,eapaka_eap=debug");
/// ```
pub fn init_logging_with_filter(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

/// Which way an EAP frame travels relative to the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Request from the network
    Rx,
    /// Response to the network
    Tx,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Rx => "RX",
            Direction::Tx => "TX",
        })
    }
}

/// Log an EAP frame: header fields at debug, payload hex at trace
///
/// `msg_type` is a short label such as `"AKA-Challenge"` or an outcome kind.
pub fn log_eap_message(direction: Direction, msg_type: &str, data: &[u8]) {
    let code = data.first().copied();
    let id = data.get(1).copied();
    tracing::debug!(
        %direction,
        msg_type,
        code = ?code,
        id = ?id,
        len = data.len(),
        "EAP-AKA frame"
    );
    tracing::trace!(%direction, hex = %HexDump(data), "EAP-AKA payload");
}

/// Lazily hex encodes a byte slice when displayed
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
