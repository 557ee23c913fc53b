//! TLS listener for WHOIS queries.
//!
//! Accepts TCP connections, hands each one to its own task for the TLS
//! handshake and the query, and keeps accepting until shut down.

mod connection;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tokio_util::sync::CancellationToken;

use crate::config::ACCEPT_ERROR_BACKOFF;
use crate::error_handling::{categorize_accept_error, AcceptErrorKind, ServeError};
use crate::whois::{QueryAuthority, Resolver};

pub use connection::{handle_connection, serve_tls_connection, ConnectionSummary};

/// A bound TLS listener serving one query per connection.
pub struct WhoisServer<C> {
    listener: TcpListener,
    acceptor: TlsAcceptor,
    resolver: Arc<Resolver<C>>,
    client_timeout: Option<Duration>,
}

impl<C: QueryAuthority + 'static> WhoisServer<C> {
    /// Binds the listening socket.
    ///
    /// `addr` is `host:port`; a host name is resolved here and the first
    /// address that binds is used.
    ///
    /// # Errors
    ///
    /// Returns `ServeError::Bind` if the name does not resolve or no resolved
    /// address can be bound.
    pub async fn bind(
        addr: &str,
        acceptor: TlsAcceptor,
        resolver: Arc<Resolver<C>>,
        client_timeout: Option<Duration>,
    ) -> Result<Self, ServeError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServeError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        Ok(Self {
            listener,
            acceptor,
            resolver,
            client_timeout,
        })
    }

    /// Address actually bound (resolves port 0).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until `shutdown` is cancelled.
    ///
    /// Each connection runs in its own task; a failing connection is logged
    /// and never affects the others. Accept errors tied to a single
    /// connection or to temporary resource exhaustion are logged and the loop
    /// continues.
    ///
    /// # Errors
    ///
    /// Returns `ServeError::Accept` when the listening socket itself fails.
    pub async fn serve(self, shutdown: CancellationToken) -> Result<(), ServeError> {
        loop {
            let (stream, peer) = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    log::info!("Shutdown requested; no longer accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(pair) => pair,
                    Err(e) => match categorize_accept_error(&e) {
                        AcceptErrorKind::Transient => {
                            log::warn!("Failed to accept connection: {}", e);
                            continue;
                        }
                        AcceptErrorKind::ResourceExhausted => {
                            log::warn!(
                                "Failed to accept connection: {}; pausing {}ms",
                                e,
                                ACCEPT_ERROR_BACKOFF.as_millis()
                            );
                            tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                            continue;
                        }
                        AcceptErrorKind::Fatal => {
                            log::error!("Listener failed: {}", e);
                            return Err(ServeError::Accept(e));
                        }
                    },
                },
            };

            log::debug!("Accepted connection from {}", peer);
            let acceptor = self.acceptor.clone();
            let resolver = Arc::clone(&self.resolver);
            let timeout = self.client_timeout;
            tokio::spawn(async move {
                match serve_tls_connection(acceptor, stream, &resolver, timeout).await {
                    Ok(summary) => log::debug!(
                        "Answered {} after {} hop(s) with {} bytes",
                        peer,
                        summary.hops,
                        summary.response_bytes
                    ),
                    Err(e) => log::warn!("Connection from {} aborted: {}", peer, e),
                }
            });
        }
    }
}
