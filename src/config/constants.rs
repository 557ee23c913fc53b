//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including the root authority, protocol port, timeouts, and safety limits.

use std::time::Duration;

// WHOIS protocol
/// Root WHOIS authority every resolution starts from (IANA)
pub const ROOT_AUTHORITY_HOST: &str = "whois.iana.org";
/// Standard WHOIS port (RFC 3912)
pub const WHOIS_PORT: u16 = 43;
/// Line terminator appended to every upstream query
pub const QUERY_TERMINATOR: &str = "\r\n";
/// Separator placed between hop responses in the final answer
pub const HOP_SEPARATOR: &str = "\n\n";

// Listener defaults
/// Default listen address (Go-style `:port` binds all IPv4 interfaces)
pub const DEFAULT_LISTEN_ADDR: &str = ":43443";
/// Default PEM certificate chain path
pub const DEFAULT_CERT_PATH: &str = "server.cer";
/// Default PEM private key path
pub const DEFAULT_KEY_PATH: &str = "server.key";

// Referral chasing
/// Maximum number of hops (root included) a single resolution makes
/// Real referral chains are two or three hops long
pub const DEFAULT_MAX_HOPS: usize = 10;
/// Upper bound accepted for `--max-hops`
pub const MAX_HOPS_LIMIT: usize = 64;

// Network operation timeouts
/// Client deadline in seconds, covering the TLS handshake and the query line
pub const CLIENT_TIMEOUT_SECS: u64 = 30;
/// Per-hop deadline in seconds (dial + write + read to EOF)
pub const UPSTREAM_TIMEOUT_SECS: u64 = 10;

// Retry strategy (upstream dials only)
/// Default number of dial retries (0 keeps a single attempt per hop)
pub const DEFAULT_UPSTREAM_RETRIES: usize = 0;
/// Upper bound accepted for `--upstream-retries`
pub const MAX_UPSTREAM_RETRIES: usize = 5;
/// Initial delay in milliseconds before the first dial retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 250;
/// Factor by which the retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between dial retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 5;

// Accept loop
/// Pause after an accept error caused by descriptor or memory exhaustion
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Size of each read from an upstream authority
pub const UPSTREAM_READ_CHUNK: usize = 4 * 1024;
