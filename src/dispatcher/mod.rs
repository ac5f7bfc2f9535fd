//! Priority dispatcher module
//!
//! A bounded-concurrency, priority-ordered work dispatcher. Callers submit
//! payloads tagged with a priority; the dispatcher runs at most a configured
//! number of them concurrently through a [`Worker`], always preferring the
//! highest pending priority (FIFO within a level), and resolves each caller's
//! future with that item's own result or failure.
//!
//! The whole system is one feedback loop: submit enqueues and pumps; every
//! worker settlement releases its slot and pumps again.

use async_trait::async_trait;
use eyre::Result;

mod config;
mod core;
mod queue;

pub use config::DispatcherConfig;
pub use core::Dispatcher;
pub use queue::{DispatcherState, DispatcherStats};

/// The user-supplied processing function
///
/// Each invocation is independent: the dispatcher calls `process` once per
/// submitted item, up to the configured limit concurrently. A failure is
/// surfaced only to the item's own caller and never disturbs scheduling.
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    /// What callers submit
    type Payload: Send + 'static;

    /// What a successful invocation produces
    type Output: Send + 'static;

    /// Process a single item
    async fn process(&self, payload: Self::Payload) -> Result<Self::Output>;
}
