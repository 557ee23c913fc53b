//! Small async helpers shared by the client and the server.

use std::future::Future;

use tokio::time::Instant;

/// Runs `fut` until `deadline`; `None` means the deadline passed first.
///
/// A `None` deadline waits for `fut` indefinitely.
pub(crate) async fn within<F: Future>(deadline: Option<Instant>, fut: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, fut).await.ok(),
        None => Some(fut.await),
    }
}
