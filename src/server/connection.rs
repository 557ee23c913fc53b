//! Per-connection handling.
//!
//! One connection carries exactly one query: read a line, resolve it, write
//! the answer, close.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::Instant;
use tokio_rustls::TlsAcceptor;

use crate::error_handling::ConnectionError;
use crate::utils::within;
use crate::whois::{QueryAuthority, Resolver};

/// What one connection did, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSummary {
    /// Query bytes received, newline included
    pub query_bytes: usize,
    /// Authorities queried
    pub hops: usize,
    /// Bytes written back
    pub response_bytes: usize,
}

/// Serves one query over an already decrypted stream.
///
/// The line is passed to the resolver byte for byte as received, trailing
/// newline included, and the answer bytes are written back untouched. `timeout` bounds the query read and, separately, the write of
/// the answer; resolution itself is bounded by the upstream hop deadlines.
///
/// # Errors
///
/// Returns a `ConnectionError` if the client sends no complete line, stops
/// reading, or misses a deadline. Nothing is written back in that case.
pub async fn handle_connection<S, C>(
    stream: S,
    resolver: &Resolver<C>,
    timeout: Option<Duration>,
) -> Result<ConnectionSummary, ConnectionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    C: QueryAuthority,
{
    let secs = timeout.map(|t| t.as_secs()).unwrap_or_default();
    let mut reader = BufReader::new(stream);
    let mut raw = Vec::new();

    let deadline = timeout.map(|t| Instant::now() + t);
    match within(deadline, reader.read_until(b'\n', &mut raw)).await {
        Some(Ok(_)) => {}
        Some(Err(e)) => return Err(ConnectionError::Read(e)),
        None => return Err(ConnectionError::Timeout { stage: "query", secs }),
    }
    if raw.last() != Some(&b'\n') {
        return Err(ConnectionError::IncompleteQuery {
            received: raw.len(),
        });
    }

    log::info!(
        "Received query for: {}",
        String::from_utf8_lossy(&raw).trim_end()
    );

    let trail = resolver.resolve_trail(&raw).await;
    let hops = trail.len();
    let response = trail.into_bytes();

    let mut stream = reader.into_inner();
    let deadline = timeout.map(|t| Instant::now() + t);
    let written = within(deadline, async {
        stream.write_all(&response).await?;
        stream.shutdown().await?;
        Ok::<(), std::io::Error>(())
    })
    .await;
    match written {
        Some(Ok(())) => {}
        Some(Err(e)) => return Err(ConnectionError::Write(e)),
        None => {
            return Err(ConnectionError::Timeout {
                stage: "response",
                secs,
            })
        }
    }

    Ok(ConnectionSummary {
        query_bytes: raw.len(),
        hops,
        response_bytes: response.len(),
    })
}

/// Completes the TLS handshake on `stream`, then serves its query.
///
/// # Errors
///
/// Returns `ConnectionError::Handshake` or a handshake timeout in addition to
/// the errors of [`handle_connection`].
pub async fn serve_tls_connection<C: QueryAuthority>(
    acceptor: TlsAcceptor,
    stream: TcpStream,
    resolver: &Resolver<C>,
    timeout: Option<Duration>,
) -> Result<ConnectionSummary, ConnectionError> {
    let deadline = timeout.map(|t| Instant::now() + t);
    let tls_stream = match within(deadline, acceptor.accept(stream)).await {
        Some(Ok(tls_stream)) => tls_stream,
        Some(Err(e)) => return Err(ConnectionError::Handshake(e)),
        None => {
            return Err(ConnectionError::Timeout {
                stage: "handshake",
                secs: timeout.map(|t| t.as_secs()).unwrap_or_default(),
            })
        }
    };

    handle_connection(tls_stream, resolver, timeout).await
}
