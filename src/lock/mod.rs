//! File locking
//!
//! Per-file read/write advisory locks keyed by (application, perimeter,
//! file). Many READ holds may share a key; a WRITE hold is exclusive.

pub mod memory;
pub mod repository;
pub mod service;
pub mod types;

pub use memory::InMemoryLockRepository;
pub use repository::{LockRepository, LockTable};
pub use service::{FileLockGuard, LockService};
pub use types::{FileLock, LockKey};
