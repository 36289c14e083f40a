// ABOUTME: Opt-in per-image-name mutual exclusion for concurrent fetches.
// ABOUTME: Keyed table of async mutexes; entries are pruned when the last holder leaves.

use crate::types::ImageName;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

type LockTable = Mutex<HashMap<ImageName, Arc<tokio::sync::Mutex<()>>>>;

/// Serializes fetches of the same image name within this process.
///
/// Fetches of different names never wait on each other. This does nothing
/// for other processes talking to the same daemon.
#[derive(Debug, Clone, Default)]
pub struct ImageLocks {
    table: Arc<LockTable>,
}

impl ImageLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other task holds `name`, then hold it until the guard drops.
    pub async fn lock(&self, name: &ImageName) -> ImageLockGuard {
        let entry = {
            let mut table = self.table.lock();
            table.entry(name.clone()).or_default().clone()
        };

        // Cancelled waiters prune on drop, same as released holders
        let pending = PendingLock {
            entry: Some(Arc::clone(&entry)),
            name,
            table: &self.table,
        };
        let guard = entry.lock_owned().await;
        pending.acquired();

        ImageLockGuard {
            guard: Some(guard),
            name: name.clone(),
            table: Arc::clone(&self.table),
        }
    }

    /// Number of names currently held or waited on.
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Held lock on one image name.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct ImageLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    name: ImageName,
    table: Arc<LockTable>,
}

impl std::fmt::Debug for ImageLockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLockGuard")
            .field("name", &self.name)
            .finish()
    }
}

impl Drop for ImageLockGuard {
    fn drop(&mut self) {
        let mut table = self.table.lock();
        self.guard = None;
        prune(&mut table, &self.name);
    }
}

/// A `lock()` call still waiting for its turn.
struct PendingLock<'a> {
    entry: Option<Arc<tokio::sync::Mutex<()>>>,
    name: &'a ImageName,
    table: &'a LockTable,
}

impl PendingLock<'_> {
    fn acquired(mut self) {
        self.entry = None;
    }
}

impl Drop for PendingLock<'_> {
    fn drop(&mut self) {
        let Some(entry) = self.entry.take() else {
            return;
        };
        let mut table = self.table.lock();
        drop(entry);
        prune(&mut table, self.name);
    }
}

/// Remove `name` if only the table still references its mutex.
///
/// Waiters clone the entry under the table lock, so a count of one means
/// nobody else is holding or waiting.
fn prune(table: &mut HashMap<ImageName, Arc<tokio::sync::Mutex<()>>>, name: &ImageName) {
    if let Some(entry) = table.get(name)
        && Arc::strong_count(entry) == 1
    {
        table.remove(name);
    }
}
