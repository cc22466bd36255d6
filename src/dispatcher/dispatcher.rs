// ABOUTME: Core bounded-concurrency dispatcher with a LIFO wait queue.
// ABOUTME: Admits up to capacity requests, queues the rest, cancels on demand.

use std::sync::Arc;

use tokio::sync::{Mutex, oneshot};

use super::executor::Executor;
use super::handle::RequestHandle;
use crate::error::DispatchError;

/// A submitted request waiting for a free slot.
struct PendingRequest<E: Executor> {
    descriptor: E::Descriptor,
    reply: oneshot::Sender<Result<E::Output, DispatchError>>,
    /// Insertion sequence number, for diagnostics only.
    seq: u64,
}

/// Mutable dispatcher state, protected by a single mutex.
struct DispatcherState<E: Executor> {
    active: usize,
    /// Waiting requests. Pushed and popped at the back, so the most
    /// recently queued request is admitted first.
    queue: Vec<PendingRequest<E>>,
    next_seq: u64,
}

/// Bounded-concurrency request dispatcher.
///
/// Accepts an unbounded stream of submissions, runs at most `capacity` of
/// them concurrently through the injected [`Executor`], and stacks the
/// remainder. Each submission gets a [`RequestHandle`] that settles exactly
/// once: with the executor's outcome, or with
/// [`DispatchError::Cancelled`] if the request is cleared from the queue
/// before it starts.
///
/// # Queue discipline
///
/// The wait queue is a stack. Among requests submitted while the dispatcher
/// is at capacity, the most recently submitted is admitted first when a
/// slot frees. Requests admitted immediately at submit time are not part of
/// that ordering. The last-in-first-out discipline is this component's
/// contract, not an implementation accident.
///
/// # Concurrency
///
/// All state transitions serialize on one internal mutex, which is never
/// held across an executor await. Each completion frees its slot and admits
/// at most one queued replacement inside a single critical section, so the
/// active count never exceeds capacity, even transiently. Executor work
/// itself runs on spawned tasks with whatever parallelism the runtime
/// provides; the dispatcher gates only how many units are in flight.
pub struct Dispatcher<E: Executor> {
    executor: Arc<E>,
    capacity: usize,
    state: Arc<Mutex<DispatcherState<E>>>,
}

impl<E: Executor> Dispatcher<E> {
    /// Create a dispatcher that runs at most `capacity` requests at once.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(executor: E, capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be positive");

        Self {
            executor: Arc::new(executor),
            capacity,
            state: Arc::new(Mutex::new(DispatcherState {
                active: 0,
                queue: Vec::new(),
                next_seq: 0,
            })),
        }
    }

    /// Submit a unit of work.
    ///
    /// If a slot is free the work starts immediately; otherwise it is
    /// queued. Either way this returns at once with a handle that settles
    /// with the work's outcome, or with a cancellation if the request is
    /// cleared while still queued. Submitting never waits for a slot.
    pub async fn submit(&self, descriptor: E::Descriptor) -> RequestHandle<E::Output> {
        let (reply, rx) = oneshot::channel();

        let mut state = self.state.lock().await;
        let seq = state.next_seq;
        state.next_seq += 1;

        if state.active < self.capacity {
            state.active += 1;
            let active = state.active;
            drop(state);

            tracing::debug!(seq, active, "admitting request");
            self.spawn_worker(descriptor, reply, seq);
        } else {
            state.queue.push(PendingRequest {
                descriptor,
                reply,
                seq,
            });
            tracing::debug!(seq, queued = state.queue.len(), "at capacity, request queued");
        }

        RequestHandle::new(rx)
    }

    /// Cancel every request still waiting in the queue.
    ///
    /// Each removed request settles with [`DispatchError::Cancelled`]; its
    /// executor is never invoked. Requests already executing are unaffected
    /// and run to completion, and no new admissions result from this call.
    ///
    /// Returns the number of requests cancelled.
    pub async fn clear_queue(&self) -> usize {
        let drained = {
            let mut state = self.state.lock().await;
            std::mem::take(&mut state.queue)
        };

        let cancelled = drained.len();
        for pending in drained {
            tracing::debug!(seq = pending.seq, "cancelling queued request");
            // The caller may have dropped its handle already.
            let _ = pending.reply.send(Err(DispatchError::Cancelled));
        }

        if cancelled > 0 {
            tracing::debug!(cancelled, "queue cleared");
        }
        cancelled
    }

    /// Number of requests currently executing.
    pub async fn active_requests(&self) -> usize {
        self.state.lock().await.active
    }

    /// Number of requests waiting in the queue.
    pub async fn queued_requests(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    /// Total unsettled work: executing plus queued.
    pub async fn outstanding_requests(&self) -> usize {
        let state = self.state.lock().await;
        state.active + state.queue.len()
    }

    /// Maximum number of concurrently executing requests.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Run one admitted request to settlement, then keep draining the
    /// queue: each completion admits at most the single most recently
    /// queued request in its place.
    fn spawn_worker(
        &self,
        descriptor: E::Descriptor,
        reply: oneshot::Sender<Result<E::Output, DispatchError>>,
        seq: u64,
    ) {
        let executor = Arc::clone(&self.executor);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            let mut current = Some((descriptor, reply, seq));

            while let Some((descriptor, reply, seq)) = current.take() {
                let outcome = executor
                    .execute(descriptor)
                    .await
                    .map_err(DispatchError::Failed);

                // Free the slot and admit the replacement in one critical
                // section; the handle is settled only after the counts are
                // consistent again.
                {
                    let mut guard = state.lock().await;
                    guard.active -= 1;
                    if let Some(next) = guard.queue.pop() {
                        guard.active += 1;
                        tracing::debug!(
                            seq = next.seq,
                            active = guard.active,
                            "admitting queued request"
                        );
                        current = Some((next.descriptor, next.reply, next.seq));
                    }
                }

                tracing::trace!(seq, "request settled");
                // The caller may have dropped its handle; that is not an
                // error and must not stall the queue.
                let _ = reply.send(outcome);
            }
        });
    }
}
