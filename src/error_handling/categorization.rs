//! Error categorization.
//!
//! Decides which listener errors the accept loop survives and which upstream
//! failures are worth another dial.

use std::io;
use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

use super::types::UpstreamError;
use crate::config::{RETRY_FACTOR, RETRY_INITIAL_DELAY_MS, RETRY_MAX_DELAY_SECS};

// errno values shared by Linux and the BSDs
const ENFILE: i32 = 23;
const EMFILE: i32 = 24;

/// How the accept loop reacts to an `accept` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptErrorKind {
    /// Per-connection failure; keep accepting immediately.
    Transient,
    /// Out of descriptors or memory; keep accepting after a short pause.
    ResourceExhausted,
    /// The listening socket is unusable; stop serving.
    Fatal,
}

/// Categorizes an error returned by `TcpListener::accept`.
///
/// Errors tied to one half-open connection (aborted, reset, refused,
/// interrupted) and resource exhaustion do not affect the listener itself.
/// Anything else (invalid socket, permission changes) is treated as fatal.
pub fn categorize_accept_error(error: &io::Error) -> AcceptErrorKind {
    if let Some(code) = error.raw_os_error() {
        if code == EMFILE || code == ENFILE {
            return AcceptErrorKind::ResourceExhausted;
        }
    }

    match error.kind() {
        io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionRefused
        | io::ErrorKind::Interrupted
        | io::ErrorKind::WouldBlock
        | io::ErrorKind::TimedOut => AcceptErrorKind::Transient,
        io::ErrorKind::OutOfMemory => AcceptErrorKind::ResourceExhausted,
        _ => AcceptErrorKind::Fatal,
    }
}

/// Returns true if the failed hop may be dialed again.
///
/// Only connection failures qualify: once the query has been written the
/// authority may have acted on it, so write/read failures and timeouts end
/// the hop.
pub fn is_retriable_upstream_error(error: &UpstreamError) -> bool {
    matches!(error, UpstreamError::Connect { .. })
}

/// Returns the delays between dial attempts for one hop.
///
/// The iterator yields `retries` delays, so the hop makes at most
/// `retries + 1` connection attempts. Zero retries keeps a single attempt.
pub fn get_retry_strategy(retries: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(RETRY_INITIAL_DELAY_MS)
        .factor(RETRY_FACTOR)
        .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
        .take(retries)
}
