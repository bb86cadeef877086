//! In-memory lock storage
//!
//! Process-wide lock table behind one `parking_lot::Mutex`. The mutex is the
//! coordination primitive: `try_lock_for` bounds the wait and the guard
//! releases it on every exit path.

use log::warn;
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::time::Duration;

use super::repository::{LockRepository, LockTable};
use super::types::{FileLock, LockKey};

#[derive(Default)]
struct LockEntries {
    records: HashMap<LockKey, Vec<FileLock>>,
}

#[derive(Default)]
pub struct InMemoryLockRepository {
    table: Mutex<LockEntries>,
}

struct TableGuard<'a>(MutexGuard<'a, LockEntries>);

impl InMemoryLockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records currently registered for `key`.
    ///
    /// Waits for the coordination primitive without a bound.
    pub fn holders(&self, key: &LockKey) -> Vec<FileLock> {
        self.table
            .lock()
            .records
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of registered records across all keys. Waits like `holders`.
    pub fn len(&self) -> usize {
        self.table.lock().records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every record for `key`, for operators clearing a leaked lock.
    ///
    /// Returns `None` when the primitive cannot be obtained within `timeout`,
    /// otherwise the number of records removed.
    pub fn clear_key(&self, key: &LockKey, timeout: Duration) -> Option<usize> {
        let Some(mut table) = self.table.try_lock_for(timeout) else {
            warn!(
                "Timed out after {:?} clearing lock records on {}",
                timeout, key.file
            );
            return None;
        };

        let removed = table.records.remove(key).map_or(0, |records| records.len());
        if removed > 0 {
            warn!("Cleared {removed} lock record(s) on {}", key.file);
        }
        Some(removed)
    }
}

impl LockRepository for InMemoryLockRepository {
    fn try_lock(&self, timeout: Duration) -> Option<Box<dyn LockTable + '_>> {
        self.table
            .try_lock_for(timeout)
            .map(|guard| Box::new(TableGuard(guard)) as Box<dyn LockTable + '_>)
    }
}

impl LockTable for TableGuard<'_> {
    fn get(&self, key: &LockKey) -> Option<FileLock> {
        self.0
            .records
            .get(key)
            .and_then(|records| records.first())
            .cloned()
    }

    fn put(&mut self, lock: FileLock) {
        self.0.records.entry(lock.key.clone()).or_default().push(lock);
    }

    fn remove(&mut self, lock: &FileLock) -> bool {
        let Some(records) = self.0.records.get_mut(&lock.key) else {
            return false;
        };
        let Some(index) = records.iter().position(|r| r == lock) else {
            return false;
        };

        records.swap_remove(index);
        if records.is_empty() {
            self.0.records.remove(&lock.key);
        }
        true
    }
}
