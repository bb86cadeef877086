//! Scoped file service
//!
//! Mediates access to folders and files namespaced by (application,
//! perimeter). Every operation is gated by identity and authorization checks,
//! and reads and writes of a single file are serialized by a per-file
//! read/write lock acquired with a bounded wait.

pub mod auth;
pub mod config;
pub mod error;
pub mod lock;
pub mod model;
pub mod service;
pub mod storage;
pub mod utils;

pub use auth::Privilege;
pub use config::ServiceConfig;
pub use error::{LockError, ServiceError, StorageError};
pub use model::{File, Folder};
pub use service::{FileService, create_file_service, create_from_config};
