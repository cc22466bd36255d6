// ABOUTME: Defines the Executor trait - the capability that performs one unit of work.
// ABOUTME: The dispatcher invokes it once per admitted request and forwards its outcome.

use async_trait::async_trait;

/// Performs a single unit of work for an opaque descriptor.
///
/// Implementations own all transport and interpretation concerns; the
/// dispatcher only cares whether the work eventually settled with a value
/// or an error.
///
/// # Contract
///
/// - `execute` is called at most once per admitted request, and never for
///   requests cancelled while still queued.
/// - `execute` must eventually settle. The dispatcher carries no timeout to
///   compensate for work that never completes, and the occupied slot is not
///   freed until it does.
#[async_trait]
pub trait Executor: Send + Sync + 'static {
    /// Opaque description of one unit of work (a target identifier, a
    /// request payload, whatever the executor understands).
    type Descriptor: Send + 'static;

    /// Value produced when the work succeeds.
    type Output: Send + 'static;

    /// Perform the work described by `descriptor`.
    async fn execute(&self, descriptor: Self::Descriptor) -> Result<Self::Output, anyhow::Error>;
}
