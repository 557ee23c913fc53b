//! TLS acceptor setup.
//!
//! Loads the PEM certificate chain and private key and builds the rustls
//! server configuration used by the listener.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;

use crate::error_handling::InitializationError;

/// Reads every certificate from a PEM file, leaf first.
///
/// # Errors
///
/// Returns `InitializationError::CertificateError` if the file cannot be read,
/// is not PEM, or holds no certificate.
pub fn load_certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>, InitializationError> {
    let cert_error = |reason: String| InitializationError::CertificateError {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| cert_error(e.to_string()))?;
    let mut reader = BufReader::new(file);
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| cert_error(e.to_string()))?;

    if certs.is_empty() {
        return Err(cert_error("no PEM certificate found".to_string()));
    }

    Ok(certs)
}

/// Reads the first private key (PKCS#8, PKCS#1 or SEC1) from a PEM file.
///
/// # Errors
///
/// Returns `InitializationError::PrivateKeyError` if the file cannot be read,
/// is not PEM, or holds no private key.
pub fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, InitializationError> {
    let key_error = |reason: String| InitializationError::PrivateKeyError {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| key_error(e.to_string()))?;
    let mut reader = BufReader::new(file);
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| key_error(e.to_string()))?
        .ok_or_else(|| key_error("no PEM private key found".to_string()))
}

/// Builds the TLS acceptor from a certificate chain and private key.
///
/// The rustls crypto provider must be installed first
/// (see [`init_crypto_provider`](super::init_crypto_provider)).
///
/// # Errors
///
/// Returns an error if either file cannot be loaded or if rustls rejects the
/// pair (for example a key that does not match the certificate).
pub fn init_tls_acceptor(
    cert_path: &Path,
    key_path: &Path,
) -> Result<TlsAcceptor, InitializationError> {
    let certs = load_certificates(cert_path)?;
    let key = load_private_key(key_path)?;

    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)?;

    log::debug!(
        "Loaded TLS certificate {} and key {}",
        cert_path.display(),
        key_path.display()
    );

    Ok(TlsAcceptor::from(Arc::new(config)))
}
