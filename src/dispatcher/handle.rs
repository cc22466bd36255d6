// ABOUTME: Implements RequestHandle, the per-submission settlement handle.
// ABOUTME: A future that resolves with the executor's outcome or a cancellation.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::DispatchError;

/// Handle for a submitted request.
///
/// Returned by every `submit` call, whether the request was admitted
/// immediately or queued. The handle is itself a [`Future`] and resolves
/// with the request's settlement:
///
/// - `Ok(value)` with exactly the value the executor produced,
/// - `Err(DispatchError::Failed)` wrapping the executor's error, or
/// - `Err(DispatchError::Cancelled)` if the request was removed from the
///   queue before it started.
///
/// The dispatcher imposes no timeout; callers that need one wrap the
/// handle themselves, e.g. `tokio::time::timeout(limit, handle)`.
///
/// Dropping a handle neither blocks nor cancels the underlying work.
pub struct RequestHandle<T> {
    rx: oneshot::Receiver<Result<T, DispatchError>>,
}

impl<T> RequestHandle<T> {
    /// Create a handle from the receiving side of a settlement channel.
    pub(crate) fn new(rx: oneshot::Receiver<Result<T, DispatchError>>) -> Self {
        Self { rx }
    }

    /// Wait for the request to settle.
    ///
    /// Equivalent to awaiting the handle directly.
    pub async fn wait(self) -> Result<T, DispatchError> {
        self.await
    }
}

impl<T> Future for RequestHandle<T> {
    type Output = Result<T, DispatchError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|settled| match settled {
            Ok(outcome) => outcome,
            // Sender dropped without settling: the dispatch task was torn
            // down before it could settle the request.
            Err(_) => Err(DispatchError::Cancelled),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_with_sent_value() {
        let (tx, rx) = oneshot::channel();
        let handle = RequestHandle::new(rx);

        tx.send(Ok::<_, DispatchError>(42u32)).unwrap();

        assert_eq!(handle.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_resolves_with_sent_error() {
        let (tx, rx) = oneshot::channel();
        let handle: RequestHandle<u32> = RequestHandle::new(rx);

        tx.send(Err(DispatchError::Cancelled)).unwrap();

        let err = handle.wait().await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_dropped_sender_maps_to_cancelled() {
        let (tx, rx) = oneshot::channel::<Result<u32, DispatchError>>();
        let handle = RequestHandle::new(rx);

        drop(tx);

        let err = handle.await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_pending_until_settled() {
        let (tx, rx) = oneshot::channel();
        let mut handle = tokio_test::task::spawn(RequestHandle::new(rx));

        tokio_test::assert_pending!(handle.poll());

        tx.send(Ok::<_, DispatchError>("done")).unwrap();

        let outcome = tokio_test::assert_ready!(handle.poll());
        assert_eq!(outcome.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_caller_side_timeout() {
        let (_tx, rx) = oneshot::channel::<Result<u32, DispatchError>>();
        let handle = RequestHandle::new(rx);

        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(10), handle).await;
        assert!(waited.is_err());
    }
}
