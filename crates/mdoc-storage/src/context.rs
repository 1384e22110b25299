//! Per-request read context.

use std::future::Future;

use tokio_util::sync::{CancellationToken, DropGuard};

use crate::error::{StorageError, StorageErrorKind};

/// Cancellation context passed to every [`Reader::read`](crate::Reader::read) call.
///
/// A request handler creates one context per request and keeps its
/// [`drop_guard`](Self::drop_guard) alive for the lifetime of the request.
/// When the client goes away and the handler future is dropped, the guard
/// cancels the token and in-flight backend I/O resolves to
/// [`StorageErrorKind::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct ReadContext {
    token: CancellationToken,
}

impl ReadContext {
    /// Create a fresh, uncancelled context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a context that is cancelled together with `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Cancel this context and every child derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the context has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Guard that cancels the context when dropped.
    #[must_use]
    pub fn drop_guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    /// Run `fut` unless the context is cancelled first.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(StorageError::new(StorageErrorKind::Cancelled)),
            result = fut => result,
        }
    }
}
