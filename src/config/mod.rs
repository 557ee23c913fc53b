//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (root authority, timeouts, limits)
//! - CLI option types and parsing
//! - The library `Config` and its validation

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{normalize_listen_addr, Config, LogFormat, LogLevel, Opt};
