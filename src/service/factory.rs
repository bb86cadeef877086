//! Service assembly
//!
//! Wires the directory, storage and lock collaborators into a `FileService`.
//! The timeout given here bounds every lock acquisition and release for the
//! lifetime of the service.

use log::info;
use std::sync::Arc;
use std::time::Duration;

use super::file_service::FileService;
use crate::auth::{
    AccessValidator, ApplicationRepository, StaticDirectory, UserRepository, UserRightRepository,
};
use crate::config::ServiceConfig;
use crate::error::StorageError;
use crate::lock::{InMemoryLockRepository, LockRepository, LockService};
use crate::storage::{FileRepository, FsFileRepository};

pub fn create_file_service(
    users: Arc<dyn UserRepository>,
    applications: Arc<dyn ApplicationRepository>,
    rights: Arc<dyn UserRightRepository>,
    files: Arc<dyn FileRepository>,
    locks: Arc<dyn LockRepository>,
    timeout: Duration,
) -> FileService {
    let validator = AccessValidator::new(users, applications, rights, Arc::clone(&files));
    let lock_service = LockService::new(locks, timeout);
    FileService::new(validator, files, lock_service)
}

/// Builds a service backed by the static directory, filesystem storage and
/// the in-memory lock table described by `config`.
pub fn create_from_config(config: &ServiceConfig) -> Result<FileService, StorageError> {
    let directory = Arc::new(StaticDirectory::from_config(&config.directory));
    let files = Arc::new(FsFileRepository::new(config.storage.root_path()));
    files.ensure_root()?;

    let timeout = config.lock.timeout();
    info!(
        "File service ready (root: {}, lock timeout: {:?})",
        config.storage.root, timeout
    );

    Ok(create_file_service(
        directory.clone(),
        directory.clone(),
        directory,
        files,
        Arc::new(InMemoryLockRepository::new()),
        timeout,
    ))
}
