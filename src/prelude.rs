// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use turnstile::prelude::*;` to get started quickly.

pub use crate::dispatcher::{Dispatcher, Executor, RequestHandle};
pub use crate::error::DispatchError;
