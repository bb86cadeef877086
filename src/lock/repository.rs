//! Lock storage contract
//!
//! A lock repository owns the lock table and the single coordination
//! primitive guarding it. The table is only reachable through the guard
//! returned by `try_lock`, and dropping that guard releases the primitive.

use std::time::Duration;

use super::types::{FileLock, LockKey};

/// Lock table operations, available while the coordination primitive is held.
pub trait LockTable {
    /// Any record registered for the key.
    fn get(&self, key: &LockKey) -> Option<FileLock>;

    fn put(&mut self, lock: FileLock);

    /// Removes one record equal to `lock`. Returns false if none matched.
    fn remove(&mut self, lock: &FileLock) -> bool;
}

pub trait LockRepository: Send + Sync {
    /// Waits at most `timeout` for the coordination primitive.
    fn try_lock(&self, timeout: Duration) -> Option<Box<dyn LockTable + '_>>;
}
