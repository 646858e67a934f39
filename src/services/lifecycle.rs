//! Per-container operation bookkeeping: busy tracking, request epochs, cancellation, and the
//! epoch-aware cache every collection container reconciles into.

use crate::error::Error;
use crate::services::notification_service::NotificationService;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio_util::sync::CancellationToken;

pub trait Identified {
    fn id(&self) -> i64;
}

impl Identified for crate::models::candidate::Candidate {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for crate::models::job::JobDescription {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone, Default)]
pub struct OperationTracker {
    inner: Arc<TrackerInner>,
}

#[derive(Default)]
struct TrackerInner {
    in_flight: AtomicUsize,
    last_epoch: AtomicU64,
    cancel: Mutex<CancellationToken>,
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an operation. The container stays busy until the returned guard drops.
    pub fn begin(&self) -> Operation {
        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        let epoch = self.inner.last_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel = self
            .inner
            .cancel
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .child_token();
        Operation {
            epoch,
            cancel,
            tracker: Arc::clone(&self.inner),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Cancels every operation started so far; later operations are unaffected.
    pub fn cancel_pending(&self) {
        let mut root = self.inner.cancel.lock().unwrap_or_else(|e| e.into_inner());
        root.cancel();
        *root = CancellationToken::new();
    }
}

/// Guard for one in-flight operation.
pub struct Operation {
    epoch: u64,
    cancel: CancellationToken,
    tracker: Arc<TrackerInner>,
}

impl Operation {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl Drop for Operation {
    fn drop(&mut self) {
        self.tracker.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Last failure message a container surfaced.
#[derive(Clone, Default)]
pub struct ErrorSlot(Arc<RwLock<Option<String>>>);

impl ErrorSlot {
    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set(&self, message: impl Into<String>) {
        *self.0.write().unwrap_or_else(|e| e.into_inner()) = Some(message.into());
    }

    pub fn clear(&self) {
        *self.0.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Records a reportable failure and raises exactly one error notification for it.
    /// Silent failures pass through untouched.
    pub fn fail(&self, notifications: &NotificationService, error: Error, fallback: &str) -> Error {
        match notifications.report_failure(&error, fallback) {
            Some(message) => {
                tracing::warn!(error = %error, "{}", fallback);
                self.set(message);
            }
            None => tracing::debug!(error = %error, "{}", fallback),
        }
        error
    }
}

/// Upper bound on remembered deltas; the oldest are forgotten first.
const JOURNAL_LIMIT: usize = 256;

#[derive(Debug, Clone)]
enum Delta<T> {
    Prepend(T),
    Replace(T),
    Remove(i64),
}

/// Cached collection reconciled from snapshots and deltas.
///
/// Deltas apply immediately and are journaled with their epoch. A snapshot older than the newest
/// applied snapshot is dropped. Otherwise it replaces the items, and every journaled delta newer
/// than it is replayed on top.
#[derive(Debug, Clone)]
pub struct Cache<T> {
    items: Vec<T>,
    snapshot_epoch: u64,
    journal: Vec<(u64, Delta<T>)>,
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            snapshot_epoch: 0,
            journal: Vec::new(),
        }
    }
}

impl<T: Identified + Clone> Cache<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    /// Returns `false` when a newer snapshot was already applied and this one was discarded.
    pub fn replace_all(&mut self, epoch: u64, items: Vec<T>) -> bool {
        if epoch <= self.snapshot_epoch {
            return false;
        }
        self.items = items;
        self.snapshot_epoch = epoch;
        self.journal.retain(|(at, _)| *at > epoch);
        for (_, delta) in &self.journal {
            Self::apply(&mut self.items, delta);
        }
        true
    }

    /// Inserts at the front, evicting any stale entry with the same id.
    pub fn prepend(&mut self, epoch: u64, item: T) {
        self.record(epoch, Delta::Prepend(item));
    }

    /// Swaps in `item` at the position of the entry with the same id. Returns whether one existed.
    pub fn replace(&mut self, epoch: u64, item: T) -> bool {
        self.record(epoch, Delta::Replace(item))
    }

    /// Removing an absent id is a no-op. Returns whether an entry was removed.
    pub fn remove(&mut self, epoch: u64, id: i64) -> bool {
        self.record(epoch, Delta::Remove(id))
    }

    fn record(&mut self, epoch: u64, delta: Delta<T>) -> bool {
        let changed = Self::apply(&mut self.items, &delta);
        if epoch > self.snapshot_epoch {
            if self.journal.len() == JOURNAL_LIMIT {
                self.journal.remove(0);
            }
            self.journal.push((epoch, delta));
        }
        changed
    }

    fn apply(items: &mut Vec<T>, delta: &Delta<T>) -> bool {
        match delta {
            Delta::Prepend(item) => {
                let id = item.id();
                items.retain(|existing| existing.id() != id);
                items.insert(0, item.clone());
                true
            }
            Delta::Replace(item) => {
                match items.iter_mut().find(|existing| existing.id() == item.id()) {
                    Some(slot) => {
                        *slot = item.clone();
                        true
                    }
                    None => false,
                }
            }
            Delta::Remove(id) => {
                let before = items.len();
                items.retain(|item| item.id() != *id);
                items.len() != before
            }
        }
    }
}
