//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use std::io;
use std::path::PathBuf;

use log::SetLoggerError;
use thiserror::Error;

use crate::whois::Authority;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// The certificate file could not be read or holds no certificate.
    #[error("Certificate error for {path}: {reason}")]
    CertificateError {
        /// Certificate path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// The private key file could not be read or holds no usable key.
    #[error("Private key error for {path}: {reason}")]
    PrivateKeyError {
        /// Key path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// rustls rejected the certificate/key pair.
    #[error("TLS configuration error: {0}")]
    TlsConfigError(#[from] rustls::Error),
}

/// Error types for invalid configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The listen address is not a socket address.
    #[error("Invalid listen address {addr:?}: {reason}")]
    InvalidListenAddr {
        /// Value as given
        addr: String,
        /// Parser message
        reason: String,
    },

    /// A numeric or path option is out of range.
    #[error("Invalid value for --{field}: {reason}")]
    InvalidValue {
        /// CLI flag name
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Transport failure while querying one upstream authority.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The TCP connection could not be established.
    #[error("Failed to connect to {authority}: {source}")]
    Connect {
        /// Authority being dialed
        authority: Authority,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The query could not be written.
    #[error("Failed to send query to {authority}: {source}")]
    Write {
        /// Authority being queried
        authority: Authority,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The response could not be read to completion.
    #[error("Failed to read response from {authority}: {source}")]
    Read {
        /// Authority being read
        authority: Authority,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The hop deadline expired.
    #[error("Timed out querying {authority} after {secs}s")]
    Timeout {
        /// Authority being queried
        authority: Authority,
        /// Deadline in seconds
        secs: u64,
    },
}

/// Error types for a single client connection.
///
/// These never reach the client; they are logged and end that connection.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The TLS handshake failed.
    #[error("TLS handshake failed: {0}")]
    Handshake(#[source] io::Error),

    /// The client closed the stream before sending a full line.
    #[error("Client closed the connection before sending a complete query ({received} bytes received)")]
    IncompleteQuery {
        /// Bytes received before EOF
        received: usize,
    },

    /// Reading the query line failed.
    #[error("Failed to read query: {0}")]
    Read(#[source] io::Error),

    /// Writing the answer or closing the stream failed.
    #[error("Failed to write response: {0}")]
    Write(#[source] io::Error),

    /// The client deadline expired.
    #[error("Client timed out during {stage} after {secs}s")]
    Timeout {
        /// Which stage was waiting ("handshake" or "query")
        stage: &'static str,
        /// Deadline in seconds
        secs: u64,
    },
}

/// Error types for the listener.
#[derive(Error, Debug)]
pub enum ServeError {
    /// The listen socket could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Requested address
        addr: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// `accept` failed in a way the listener cannot recover from.
    #[error("Listener failed: {0}")]
    Accept(#[source] io::Error),
}
