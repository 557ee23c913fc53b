//! Upstream query client.
//!
//! One plaintext TCP connection per hop: send the query, read until the
//! authority closes the stream.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::Instant;
use tokio_retry::RetryIf;

use super::types::{Authority, HopOutcome, HopResponse};
use crate::config::{QUERY_TERMINATOR, UPSTREAM_READ_CHUNK};
use crate::error_handling::{get_retry_strategy, is_retriable_upstream_error, UpstreamError};
use crate::utils::within;

/// Sends one query to one authority.
///
/// Implementations never fail: transport problems are reported inside the
/// returned `HopOutcome` so the resolver decides what a failed hop means.
#[async_trait]
pub trait QueryAuthority: Send + Sync {
    /// Queries `authority` with the raw `query` bytes and returns its full
    /// response.
    async fn query_authority(&self, query: &[u8], authority: &Authority) -> HopOutcome;
}

/// Production client speaking WHOIS (RFC 3912) over TCP.
#[derive(Debug, Clone, Default)]
pub struct TcpAuthorityClient {
    timeout: Option<Duration>,
    retries: usize,
}

impl TcpAuthorityClient {
    /// Creates a client with no deadline and a single dial attempt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds each hop (dial, write and read together) by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retries a failed dial up to `retries` times.
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    fn timeout_error(&self, authority: &Authority) -> UpstreamError {
        UpstreamError::Timeout {
            authority: authority.clone(),
            secs: self.timeout.map(|t| t.as_secs()).unwrap_or_default(),
        }
    }

    async fn connect(&self, authority: &Authority) -> Result<TcpStream, UpstreamError> {
        RetryIf::start(
            get_retry_strategy(self.retries),
            || {
                let authority = authority.clone();
                async move {
                    log::debug!("Connecting to {}", authority);
                    TcpStream::connect((authority.host(), authority.port()))
                        .await
                        .map_err(|source| UpstreamError::Connect {
                            authority: authority.clone(),
                            source,
                        })
                }
            },
            |e: &UpstreamError| {
                let retry = is_retriable_upstream_error(e);
                if retry {
                    log::debug!("{}; retrying", e);
                }
                retry
            },
        )
        .await
    }

    async fn exchange(
        &self,
        query: &[u8],
        authority: &Authority,
        deadline: Option<Instant>,
    ) -> HopOutcome {
        let mut stream = match within(deadline, self.connect(authority)).await {
            Some(Ok(stream)) => stream,
            Some(Err(e)) => return HopOutcome::failed(e),
            None => return HopOutcome::failed(self.timeout_error(authority)),
        };

        let mut request = Vec::with_capacity(query.len() + QUERY_TERMINATOR.len());
        request.extend_from_slice(query);
        request.extend_from_slice(QUERY_TERMINATOR.as_bytes());
        match within(deadline, stream.write_all(&request)).await {
            Some(Ok(())) => {}
            Some(Err(source)) => {
                return HopOutcome::failed(UpstreamError::Write {
                    authority: authority.clone(),
                    source,
                })
            }
            None => return HopOutcome::failed(self.timeout_error(authority)),
        }

        let mut data = Vec::new();
        let mut chunk = vec![0u8; UPSTREAM_READ_CHUNK];
        loop {
            match within(deadline, stream.read(&mut chunk)).await {
                Some(Ok(0)) => break,
                Some(Ok(n)) => data.extend_from_slice(&chunk[..n]),
                Some(Err(source)) => {
                    return HopOutcome::Failed {
                        partial: HopResponse::from(data),
                        error: UpstreamError::Read {
                            authority: authority.clone(),
                            source,
                        },
                    }
                }
                None => {
                    return HopOutcome::Failed {
                        partial: HopResponse::from(data),
                        error: self.timeout_error(authority),
                    }
                }
            }
        }

        log::trace!("Read {} bytes from {}", data.len(), authority);
        HopOutcome::Complete(HopResponse::from(data))
    }
}

#[async_trait]
impl QueryAuthority for TcpAuthorityClient {
    async fn query_authority(&self, query: &[u8], authority: &Authority) -> HopOutcome {
        let deadline = self.timeout.map(|t| Instant::now() + t);
        self.exchange(query, authority, deadline).await
    }
}
