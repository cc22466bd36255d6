// ABOUTME: Defines the error type for request dispatch using thiserror.
// ABOUTME: Distinguishes administrative cancellation from executor failure.

/// Failure kinds a dispatched request can settle with.
///
/// Every request settles exactly once: with the executor's success value,
/// with [`DispatchError::Failed`] wrapping the executor's error, or with
/// [`DispatchError::Cancelled`] if it was removed from the queue before it
/// ever started. Callers that need to tell cancellation apart from a
/// genuine failure should check the kind via [`DispatchError::is_cancelled`].
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The request was cancelled while still queued, before execution began.
    ///
    /// Produced only by the dispatcher itself (queue clearing, or a
    /// dispatch task torn down before settlement), never by an executor.
    #[error("request cancelled before execution")]
    Cancelled,

    /// The executor failed the request.
    ///
    /// The underlying error is forwarded verbatim; the dispatcher never
    /// interprets or retries it.
    #[error("request failed: {0}")]
    Failed(#[source] anyhow::Error),
}

impl DispatchError {
    /// Returns true if this is an administrative cancellation rather than
    /// an executor failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DispatchError::Cancelled)
    }
}
