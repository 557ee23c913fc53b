// Shared test helpers: scripted WHOIS authorities and TLS material.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName};
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use whois_relay::error_handling::UpstreamError;
use whois_relay::whois::{Authority, HopOutcome, HopResponse, QueryAuthority};

/// Scripted reply for one authority host.
#[derive(Clone)]
#[allow(dead_code)] // Not every test file uses every variant
pub enum Reply {
    /// Answer with these bytes and close.
    Text(Vec<u8>),
    /// Send this much, then fail the read.
    Partial(Vec<u8>),
    /// Fail to connect.
    Unreachable,
}

/// Upstream client answering from a table keyed by host.
///
/// Hosts missing from the table are unreachable. Every call is recorded as
/// `(query, authority)`.
#[derive(Clone, Default)]
pub struct ScriptedClient {
    replies: HashMap<String, Reply>,
    calls: Arc<Mutex<Vec<(Vec<u8>, Authority)>>>,
}

#[allow(dead_code)] // Used by other test files
impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, host: &str, text: &str) -> Self {
        self.bytes(host, text.as_bytes())
    }

    pub fn bytes(mut self, host: &str, bytes: &[u8]) -> Self {
        self.replies
            .insert(host.to_string(), Reply::Text(bytes.to_vec()));
        self
    }

    pub fn partial(mut self, host: &str, text: &str) -> Self {
        self.replies
            .insert(host.to_string(), Reply::Partial(text.as_bytes().to_vec()));
        self
    }

    pub fn unreachable(mut self, host: &str) -> Self {
        self.replies.insert(host.to_string(), Reply::Unreachable);
        self
    }

    pub fn calls(&self) -> Vec<(Vec<u8>, Authority)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn visited_hosts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|(_, authority)| authority.host().to_string())
            .collect()
    }
}

#[async_trait]
impl QueryAuthority for ScriptedClient {
    async fn query_authority(&self, query: &[u8], authority: &Authority) -> HopOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_vec(), authority.clone()));

        match self.replies.get(authority.host()) {
            Some(Reply::Text(bytes)) => HopOutcome::Complete(HopResponse::from_bytes(bytes)),
            Some(Reply::Partial(bytes)) => HopOutcome::Failed {
                partial: HopResponse::from_bytes(bytes),
                error: UpstreamError::Read {
                    authority: authority.clone(),
                    source: io::Error::from(io::ErrorKind::ConnectionReset),
                },
            },
            Some(Reply::Unreachable) | None => HopOutcome::failed(UpstreamError::Connect {
                authority: authority.clone(),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            }),
        }
    }
}

/// Self-signed certificate for `localhost` written to a temp directory.
#[allow(dead_code)] // Used by other test files
pub struct TestCertificate {
    pub dir: TempDir,
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    pub cert_der: CertificateDer<'static>,
}

#[allow(dead_code)] // Used by other test files
pub fn create_test_certificate() -> TestCertificate {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
        .expect("Failed to generate certificate");
    let dir = TempDir::new().expect("Failed to create temp dir");
    let cert_path = dir.path().join("server.cer");
    let key_path = dir.path().join("server.key");
    std::fs::write(&cert_path, certified.cert.pem()).expect("Failed to write certificate");
    std::fs::write(&key_path, certified.key_pair.serialize_pem()).expect("Failed to write key");

    TestCertificate {
        dir,
        cert_path,
        key_path,
        cert_der: certified.cert.der().clone(),
    }
}

/// TLS connector trusting only `cert`.
#[allow(dead_code)] // Used by other test files
pub fn create_test_connector(cert: &TestCertificate) -> TlsConnector {
    let mut roots = RootCertStore::empty();
    roots
        .add(cert.cert_der.clone())
        .expect("Failed to trust test certificate");
    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}

#[allow(dead_code)] // Used by other test files
pub fn localhost() -> ServerName<'static> {
    ServerName::try_from("localhost").expect("valid server name")
}
