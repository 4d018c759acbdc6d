//! Registration storage with a debounced file mirror.
//!
//! Mutations mark the store dirty and wake the flusher task, which waits for
//! a quiet period and then rewrites the whole file once. The binary calls
//! [`RegistrationStore::flush`] on shutdown so nothing pending is lost.

mod backend;
mod registrations;

pub use backend::{Backend, JsonFileBackend, MemoryBackend};
pub use registrations::Registrations;

use crate::record::Registration;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify, RwLock};
use tracing::{debug, error, info, instrument};

struct Inner {
    records: RwLock<Registrations>,
    backend: Backend,
    debounce: Duration,
    dirty: AtomicBool,
    changed: Notify,
    flush_lock: Mutex<()>,
    writes: AtomicU64,
}

/// Shared handle to the registration list.
#[derive(Clone)]
pub struct RegistrationStore {
    inner: Arc<Inner>,
}

impl RegistrationStore {
    /// Build a store from whatever the backend currently holds.
    pub async fn load(backend: Backend, debounce: Duration) -> Self {
        let records = backend.load().await;
        Self::with_records(records, backend, debounce)
    }

    /// Build a store around an existing list.
    pub fn with_records(records: Registrations, backend: Backend, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                records: RwLock::new(records),
                backend,
                debounce,
                dirty: AtomicBool::new(false),
                changed: Notify::new(),
                flush_lock: Mutex::new(()),
                writes: AtomicU64::new(0),
            }),
        }
    }

    /// Memory-only store, mostly for tests.
    pub fn memory() -> Self {
        Self::with_records(Registrations::new(), Backend::memory(), Duration::ZERO)
    }

    /// Add a record at the end and schedule a write.
    #[instrument(skip_all)]
    pub async fn append(&self, record: Registration) {
        let count = {
            let mut records = self.inner.records.write().await;
            records.append(record);
            records.len()
        };
        debug!(count, "Registration appended");
        self.mark_dirty();
    }

    /// Remove every record and schedule a write.
    #[instrument(skip_all)]
    pub async fn clear(&self) {
        let removed = {
            let mut records = self.inner.records.write().await;
            let removed = records.len();
            records.clear();
            removed
        };
        info!(removed, "Registrations cleared");
        self.mark_dirty();
    }

    /// Snapshot of every record in insertion order.
    pub async fn list(&self) -> Vec<Registration> {
        self.inner.records.read().await.to_vec()
    }

    pub async fn len(&self) -> usize {
        self.inner.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.records.read().await.is_empty()
    }

    /// True when in-memory changes have not reached the backend yet.
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.load(Ordering::Acquire)
    }

    /// Number of successful backend writes so far.
    pub fn write_count(&self) -> u64 {
        self.inner.writes.load(Ordering::Relaxed)
    }

    fn mark_dirty(&self) {
        self.inner.dirty.store(true, Ordering::Release);
        self.inner.changed.notify_one();
    }

    /// Write the full list if anything changed since the last write.
    ///
    /// Failures are logged and leave the store dirty; the in-memory list
    /// stays authoritative. Returns whether a write was attempted.
    pub async fn flush(&self) -> bool {
        let _guard = self.inner.flush_lock.lock().await;

        if !self.inner.dirty.swap(false, Ordering::AcqRel) {
            return false;
        }

        let snapshot = self.inner.records.read().await.clone();
        match self.inner.backend.save(&snapshot).await {
            Ok(()) => {
                self.inner.writes.fetch_add(1, Ordering::Relaxed);
                info!(count = snapshot.len(), "Registrations saved");
            }
            Err(e) => {
                self.inner.dirty.store(true, Ordering::Release);
                error!("Failed saving registrations: {}", e);
            }
        }
        true
    }

    /// Debounce loop: after each change, wait until no further change
    /// arrives for the debounce window, then flush once.
    pub async fn run_flusher(self) {
        loop {
            self.inner.changed.notified().await;

            while tokio::time::timeout(self.inner.debounce, self.inner.changed.notified())
                .await
                .is_ok()
            {}

            self.flush().await;
        }
    }
}
