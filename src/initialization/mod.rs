//! Application initialization and resource setup.
//!
//! This module provides functions to initialize process-wide resources:
//! - Logger
//! - rustls crypto provider
//! - TLS acceptor (certificate chain and private key)
//!
//! All initialization functions return proper error types for error handling.

mod logger;
mod tls;

use rustls::crypto::{ring::default_provider, CryptoProvider};

// Re-export public API
pub use logger::init_logger_with;
pub use tls::{init_tls_acceptor, load_certificates, load_private_key};

/// Initializes the crypto provider for TLS operations.
///
/// Configures the global crypto provider for `rustls`. This must be called before
/// the TLS acceptor is built.
pub fn init_crypto_provider() {
    // The return value is ignored because reinstalling the provider is harmless
    let _ = CryptoProvider::install_default(default_provider());
}
