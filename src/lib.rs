// ABOUTME: Root module for turnstile - bounded-concurrency request dispatch.
// ABOUTME: Re-exports all public types from submodules.

pub mod dispatcher;
pub mod error;
pub mod prelude;

pub use error::DispatchError;
