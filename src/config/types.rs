//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    CLIENT_TIMEOUT_SECS, DEFAULT_CERT_PATH, DEFAULT_KEY_PATH, DEFAULT_LISTEN_ADDR,
    DEFAULT_MAX_HOPS, DEFAULT_UPSTREAM_RETRIES, MAX_HOPS_LIMIT, MAX_UPSTREAM_RETRIES,
    UPSTREAM_TIMEOUT_SECS,
};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Serve on the default port with server.cer / server.key from the working directory
/// whois_relay
///
/// # Custom address and key material
/// whois_relay --listen 127.0.0.1:4343 --cert tls/chain.pem --key tls/key.pem
///
/// # Bound every hop to 5 seconds and retry failed dials twice
/// whois_relay --upstream-timeout-secs 5 --upstream-retries 2
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "whois_relay",
    about = "Answers WHOIS queries over TLS by following referrals from the IANA root."
)]
pub struct Opt {
    /// Address to listen on (`host:port`, `ip:port`, `[v6]:port` or `:port`)
    #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen: String,

    /// Server certificate chain (PEM)
    #[arg(long, value_parser, default_value = DEFAULT_CERT_PATH)]
    pub cert: PathBuf,

    /// Server private key (PEM)
    #[arg(long, value_parser, default_value = DEFAULT_KEY_PATH)]
    pub key: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Maximum number of authorities queried per request (root included)
    #[arg(long, default_value_t = DEFAULT_MAX_HOPS)]
    pub max_hops: usize,

    /// Deadline for the TLS handshake and the query line, in seconds (0 disables)
    #[arg(long, default_value_t = CLIENT_TIMEOUT_SECS)]
    pub client_timeout_secs: u64,

    /// Deadline for each upstream hop, in seconds (0 disables)
    #[arg(long, default_value_t = UPSTREAM_TIMEOUT_SECS)]
    pub upstream_timeout_secs: u64,

    /// Number of times a failed upstream dial is retried
    ///
    /// Only the connection attempt is retried; a hop that already sent its
    /// query is never repeated.
    #[arg(long, default_value_t = DEFAULT_UPSTREAM_RETRIES)]
    pub upstream_retries: usize,
}

/// Library configuration (no CLI dependencies).
///
/// Built once at startup and passed by reference into the serving components.
///
/// ```no_run
/// use whois_relay::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     listen: "127.0.0.1:4343".to_string(),
///     cert_path: PathBuf::from("tls/chain.pem"),
///     key_path: PathBuf::from("tls/key.pem"),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address
    pub listen: String,

    /// PEM certificate chain path
    pub cert_path: PathBuf,

    /// PEM private key path
    pub key_path: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Maximum hops per resolution
    pub max_hops: usize,

    /// Client deadline in seconds (0 disables)
    pub client_timeout_secs: u64,

    /// Per-hop upstream deadline in seconds (0 disables)
    pub upstream_timeout_secs: u64,

    /// Dial retries per hop
    pub upstream_retries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN_ADDR.to_string(),
            cert_path: PathBuf::from(DEFAULT_CERT_PATH),
            key_path: PathBuf::from(DEFAULT_KEY_PATH),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            max_hops: DEFAULT_MAX_HOPS,
            client_timeout_secs: CLIENT_TIMEOUT_SECS,
            upstream_timeout_secs: UPSTREAM_TIMEOUT_SECS,
            upstream_retries: DEFAULT_UPSTREAM_RETRIES,
        }
    }
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            listen: opt.listen,
            cert_path: opt.cert,
            key_path: opt.key,
            log_level: opt.log_level,
            log_format: opt.log_format,
            max_hops: opt.max_hops,
            client_timeout_secs: opt.client_timeout_secs,
            upstream_timeout_secs: opt.upstream_timeout_secs,
            upstream_retries: opt.upstream_retries,
        }
    }
}

impl Config {
    /// Checks that the configuration can be served.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` describing the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_listen_addr(&self.listen)?;

        if self.cert_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cert",
                reason: "path must not be empty".to_string(),
            });
        }
        if self.key_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "key",
                reason: "path must not be empty".to_string(),
            });
        }
        if self.max_hops == 0 || self.max_hops > MAX_HOPS_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "max-hops",
                reason: format!("must be between 1 and {}", MAX_HOPS_LIMIT),
            });
        }
        if self.upstream_retries > MAX_UPSTREAM_RETRIES {
            return Err(ConfigError::InvalidValue {
                field: "upstream-retries",
                reason: format!("must be at most {}", MAX_UPSTREAM_RETRIES),
            });
        }

        Ok(())
    }

    /// Client deadline, or `None` when disabled.
    pub fn client_timeout(&self) -> Option<Duration> {
        seconds_to_deadline(self.client_timeout_secs)
    }

    /// Per-hop upstream deadline, or `None` when disabled.
    pub fn upstream_timeout(&self) -> Option<Duration> {
        seconds_to_deadline(self.upstream_timeout_secs)
    }
}

fn seconds_to_deadline(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Normalizes a listen address into a form the listener can bind.
///
/// Accepts `[v6]:port` and `ip:port` socket addresses, `name:port` host
/// names (resolved when the listener binds), and the `:port` shorthand which
/// binds every IPv4 interface.
///
/// # Errors
///
/// Returns `ConfigError::InvalidListenAddr` if the value has no usable host
/// or port.
pub fn normalize_listen_addr(value: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidListenAddr {
        addr: value.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = value.trim();
    let candidate = if trimmed.starts_with(':') {
        format!("0.0.0.0{}", trimmed)
    } else {
        trimmed.to_string()
    };

    if candidate.parse::<SocketAddr>().is_ok() {
        return Ok(candidate);
    }

    let (host, port) = candidate
        .rsplit_once(':')
        .ok_or_else(|| invalid("expected host:port"))?;
    if host.is_empty() || host.contains([':', '[', ']']) || host.contains(char::is_whitespace) {
        return Err(invalid("invalid host"));
    }
    port.parse::<u16>()
        .map_err(|e| invalid(&format!("invalid port: {}", e)))?;

    Ok(candidate)
}
