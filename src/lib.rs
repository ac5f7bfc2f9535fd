//! dispatchq - Bounded-concurrency priority work dispatcher
//!
//! Callers submit payloads tagged with a non-negative priority; the
//! dispatcher runs at most a configured number of them concurrently through
//! a user-supplied [`Worker`], always preferring the highest pending
//! priority, and settles each caller's future exactly once with that item's
//! own result or failure.
//!
//! # Core Concepts
//!
//! - **One feedback loop**: enqueue triggers a dispatch attempt; every worker
//!   settlement releases its slot and triggers another. Nothing else moves
//!   items between pending, running, and settled.
//! - **Priority then arrival**: a strictly higher level is drained first at
//!   every dispatch decision; items within a level start in submission order.
//! - **Failure isolation**: a failing (or panicking) worker surfaces only to
//!   its own caller; the slot is released and scheduling resumes.
//!
//! # Modules
//!
//! - [`dispatcher`] - the priority dispatcher and its [`Worker`] seam
//! - [`error`] - error types
//! - [`index`] - composite-key lookup table used alongside the dispatcher
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use dispatchq::{Dispatcher, DispatcherConfig, Worker};
//!
//! struct Doubler;
//!
//! #[async_trait]
//! impl Worker for Doubler {
//!     type Payload = u64;
//!     type Output = u64;
//!
//!     async fn process(&self, payload: u64) -> eyre::Result<u64> {
//!         Ok(payload * 2)
//!     }
//! }
//!
//! # async fn run() -> Result<(), dispatchq::DispatchError> {
//! let dispatcher = Dispatcher::new(Doubler, DispatcherConfig::with_limit(4))?;
//! let result = dispatcher.submit(21, 0).await?;
//! assert_eq!(result, 42);
//! # Ok(())
//! # }
//! ```

pub mod dispatcher;
pub mod error;
pub mod index;

// Re-export commonly used types
pub use dispatcher::{Dispatcher, DispatcherConfig, DispatcherState, DispatcherStats, Worker};
pub use error::DispatchError;
pub use index::CompositeIndex;
