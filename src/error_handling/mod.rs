//! Error handling.
//!
//! This module provides:
//! - Error type definitions for bootstrap, configuration, upstream hops,
//!   client connections and the listener
//! - Categorization of accept errors and upstream failures
//!
//! None of these errors are ever written to a client: a client only receives
//! the text accumulated by its resolution.

mod categorization;
mod types;

// Re-export public API
pub use categorization::{
    categorize_accept_error, get_retry_strategy, is_retriable_upstream_error, AcceptErrorKind,
};
pub use types::{ConfigError, ConnectionError, InitializationError, ServeError, UpstreamError};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whois::Authority;
    use std::io;

    #[test]
    fn test_upstream_error_messages_name_the_authority() {
        let err = UpstreamError::Timeout {
            authority: Authority::new("whois.verisign-grs.com", 43),
            secs: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("whois.verisign-grs.com:43"));
        assert!(msg.contains("10s"));
    }

    #[test]
    fn test_connection_error_messages() {
        let err = ConnectionError::IncompleteQuery { received: 7 };
        assert!(err.to_string().contains("7 bytes"));

        let err = ConnectionError::Timeout {
            stage: "handshake",
            secs: 30,
        };
        assert!(err.to_string().contains("handshake"));
    }

    #[test]
    fn test_serve_error_keeps_source() {
        use std::error::Error;

        let err = ServeError::Bind {
            addr: "0.0.0.0:43443".to_string(),
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert!(err.to_string().contains("0.0.0.0:43443"));
        assert!(err.source().is_some());
    }
}
