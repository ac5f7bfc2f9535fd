//! Dispatcher implementation

use std::sync::Arc;

use tokio::sync::{Mutex, oneshot};
use tracing::{debug, warn};

use crate::error::DispatchError;

use super::Worker;
use super::config::DispatcherConfig;
use super::queue::{DispatcherState, DispatcherStats, PendingStore};

/// A submitted item waiting in the pending store
struct WorkItem<W: Worker> {
    payload: W::Payload,
    reply: oneshot::Sender<Result<W::Output, DispatchError>>,
}

/// Internal state protected by mutex
struct Inner<W: Worker> {
    /// Per-priority FIFO queues of waiting items
    pending: PendingStore<WorkItem<W>>,

    /// Worker invocations currently in flight
    running: usize,

    /// Statistics
    stats: DispatcherStats,
}

struct Shared<W: Worker> {
    config: DispatcherConfig,
    worker: Arc<W>,
    inner: Mutex<Inner<W>>,
}

/// The Dispatcher runs submitted items through a [`Worker`] with a bounded
/// number of concurrent invocations, highest pending priority first.
///
/// Handles are cheap to clone and share one dispatcher. All state mutation
/// goes through the pump transition, triggered after every enqueue and every
/// worker settlement; workers run concurrently but never block the dispatch
/// decision path itself.
pub struct Dispatcher<W: Worker> {
    shared: Arc<Shared<W>>,
}

impl<W: Worker> Clone for Dispatcher<W> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<W: Worker> Dispatcher<W> {
    /// Create a new dispatcher with the given worker and configuration
    ///
    /// Rejects a zero concurrency limit.
    pub fn new(worker: W, config: DispatcherConfig) -> Result<Self, DispatchError> {
        debug!(limit = config.limit, "Dispatcher::new: called");
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                worker: Arc::new(worker),
                inner: Mutex::new(Inner {
                    pending: PendingStore::new(),
                    running: 0,
                    stats: DispatcherStats::default(),
                }),
            }),
        })
    }

    /// Submit an item at the given priority and await its result
    ///
    /// The returned future settles exactly once: with the worker's output,
    /// or with the worker's own failure. Higher priorities are dispatched
    /// first; items at the same priority start in submission order.
    pub async fn submit(&self, payload: W::Payload, priority: u32) -> Result<W::Output, DispatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();

        {
            let mut inner = self.shared.inner.lock().await;
            inner.pending.push(
                priority,
                WorkItem {
                    payload,
                    reply: reply_tx,
                },
            );
            inner.stats.total_submitted += 1;
            inner.stats.peak_queue_depth = inner.stats.peak_queue_depth.max(inner.pending.len());
            debug!(priority, pending = inner.pending.len(), "Dispatcher::submit: enqueued");
        }

        Arc::clone(&self.shared).pump().await;

        reply_rx.await.unwrap_or(Err(DispatchError::Disconnected))
    }

    /// Total pending items across all levels (excludes running ones)
    pub async fn len(&self) -> usize {
        self.shared.inner.lock().await.pending.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Whether a new submission would wait rather than start immediately
    pub async fn will_queue(&self) -> bool {
        self.shared.inner.lock().await.running >= self.shared.config.limit
    }

    /// Estimate the 1-based queue position of a hypothetical new item
    ///
    /// Returns 0 when a slot is free (it would start immediately); otherwise
    /// one more than the count of pending items at the same or higher
    /// priority. A snapshot with no side effects, invalidated by any
    /// subsequent submission.
    pub async fn next_position(&self, priority: u32) -> usize {
        let inner = self.shared.inner.lock().await;
        if inner.running < self.shared.config.limit {
            0
        } else {
            inner.pending.at_or_above(priority) + 1
        }
    }

    /// Last-recorded maximum priority
    ///
    /// May be stale once that level's queue drains; callers needing an
    /// authoritative answer should use [`Dispatcher::len`] or
    /// [`Dispatcher::is_empty`] instead.
    pub async fn highest_priority(&self) -> u32 {
        self.shared.inner.lock().await.pending.highest()
    }

    /// The configured concurrency limit
    pub fn limit(&self) -> usize {
        self.shared.config.limit
    }

    /// Get current occupancy and statistics
    pub async fn state(&self) -> DispatcherState {
        let inner = self.shared.inner.lock().await;
        DispatcherState {
            running: inner.running,
            queued: inner.pending.len(),
            stats: inner.stats.clone(),
        }
    }

    /// Get the dispatcher statistics
    pub async fn stats(&self) -> DispatcherStats {
        self.shared.inner.lock().await.stats.clone()
    }
}

impl<W: Worker> Shared<W> {
    /// The single scheduling transition
    ///
    /// While a slot is free and items are pending, pop the oldest item of the
    /// highest non-empty level and start its worker. Safe to call redundantly;
    /// a no-op when the preconditions are unmet.
    fn pump(self: Arc<Self>) -> impl Future<Output = ()> + Send {
        async move {
            let mut inner = self.inner.lock().await;
            while inner.running < self.config.limit {
                let Some((priority, item)) = inner.pending.pop_highest() else {
                    break;
                };
                inner.running += 1;
                inner.stats.peak_concurrent = inner.stats.peak_concurrent.max(inner.running);
                debug!(
                    priority,
                    running = inner.running,
                    pending = inner.pending.len(),
                    "Dispatcher::pump: dispatching"
                );
                tokio::spawn(Arc::clone(&self).run_item(priority, item));
            }
        }
    }

    /// Run one item to settlement, release its slot, and pump again
    async fn run_item(self: Arc<Self>, priority: u32, item: WorkItem<W>) {
        let WorkItem { payload, reply } = item;

        // The worker runs in its own task so a panic surfaces as a JoinError
        // instead of skipping the slot release below.
        let worker = Arc::clone(&self.worker);
        let handle = tokio::spawn(async move { worker.process(payload).await });

        let outcome = match handle.await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(report)) => {
                debug!(priority, error = %report, "Dispatcher::run_item: worker failed");
                Err(DispatchError::Worker(report))
            }
            Err(join_err) if join_err.is_panic() => {
                warn!(priority, "Dispatcher::run_item: worker panicked");
                Err(DispatchError::WorkerPanicked)
            }
            Err(_) => Err(DispatchError::Disconnected),
        };
        let failed = outcome.is_err();

        if reply.send(outcome).is_err() {
            debug!(priority, "Dispatcher::run_item: caller gone before settlement");
        }

        {
            let mut inner = self.inner.lock().await;
            inner.running -= 1;
            if failed {
                inner.stats.total_failed += 1;
            } else {
                inner.stats.total_completed += 1;
            }
            debug!(priority, running = inner.running, "Dispatcher::run_item: slot released");
        }

        // A freed slot immediately considers the next-highest pending item
        self.pump().await;
    }
}
