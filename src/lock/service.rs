//! Lock service
//!
//! Acquires and releases per-file advisory locks. Every table mutation runs
//! while the repository's coordination primitive is held, so the
//! read-decide-write compatibility check is atomic across all keys. Waiting
//! for the primitive is bounded by one timeout used for both acquisition and
//! release.

use log::{debug, warn};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::repository::{LockRepository, LockTable};
use super::types::{FileLock, LockKey};
use crate::auth::Privilege;
use crate::error::{LockError, LockPhase, handlers};
use crate::model::File;

pub struct LockService {
    repository: Arc<dyn LockRepository>,
    timeout: Duration,
}

impl LockService {
    pub fn new(repository: Arc<dyn LockRepository>, timeout: Duration) -> Self {
        Self {
            repository,
            timeout,
        }
    }

    /// Registers a hold on the file and returns a guard releasing it.
    ///
    /// Fails with `LockError::AlreadyLocked` when a WRITE is requested while
    /// any record exists, or a READ is requested against a WRITE record.
    /// Nothing is registered on failure.
    pub fn lock_file(
        &self,
        user: &str,
        application: &str,
        perimeter: &str,
        privilege: Privilege,
        file: &File,
    ) -> Result<FileLockGuard<'_>, LockError> {
        let lock = FileLock::new(LockKey::new(application, perimeter, file), user, privilege);

        self.with_synchronized(&lock, LockPhase::Acquire, |table| {
            if let Some(current) = table.get(&lock.key) {
                if !current.is_compatible_with(&lock) {
                    warn!(
                        "User '{}' cannot {} {} on {}/{}: held by '{}' ({})",
                        user,
                        privilege.action(),
                        file,
                        application,
                        perimeter,
                        current.user,
                        current.privilege
                    );
                    return Err(LockError::AlreadyLocked {
                        user: user.to_string(),
                        application: application.to_string(),
                        perimeter: perimeter.to_string(),
                        privilege,
                        file: file.clone(),
                        holder: current.user,
                    });
                }
            }
            table.put(lock.clone());
            Ok(())
        })?;

        debug!(
            "User '{user}' locked {file} for {} on {application}/{perimeter}",
            privilege.action()
        );
        Ok(FileLockGuard {
            service: self,
            lock: Some(lock),
        })
    }

    /// Removes one registered hold.
    pub fn unlock_file(&self, lock: &FileLock) -> Result<(), LockError> {
        self.with_synchronized(lock, LockPhase::Release, |table| {
            if !table.remove(lock) {
                warn!(
                    "No lock record for user '{}' on {} to release",
                    lock.user, lock.key.file
                );
            }
            Ok(())
        })?;

        debug!(
            "User '{}' unlocked {} on {}/{}",
            lock.user, lock.key.file, lock.key.application, lock.key.perimeter
        );
        Ok(())
    }

    /// Runs `action` on the lock table while the coordination primitive is
    /// held. The primitive is released when the table guard drops, whatever
    /// `action` returns.
    fn with_synchronized<T>(
        &self,
        lock: &FileLock,
        phase: LockPhase,
        action: impl FnOnce(&mut dyn LockTable) -> Result<T, LockError>,
    ) -> Result<T, LockError> {
        let Some(mut table) = self.repository.try_lock(self.timeout) else {
            warn!(
                "Timed out after {:?} waiting to {} {} for user '{}'",
                self.timeout, phase, lock.key.file, lock.user
            );
            return Err(LockError::Timeout {
                user: lock.user.clone(),
                application: lock.key.application.clone(),
                perimeter: lock.key.perimeter.clone(),
                privilege: lock.privilege,
                file: lock.key.file.clone(),
                phase,
                timeout: self.timeout,
            });
        };

        action(table.as_mut())
    }
}

/// Scoped hold on a file lock.
///
/// Call `release` to observe release failures. If the guard is dropped
/// without it (early return, panic unwinding) the hold is released in `drop`
/// and a failure is logged.
#[must_use = "dropping the guard releases the file lock immediately"]
pub struct FileLockGuard<'a> {
    service: &'a LockService,
    lock: Option<FileLock>,
}

impl FileLockGuard<'_> {
    pub fn release(mut self) -> Result<(), LockError> {
        match self.lock.take() {
            Some(lock) => self.service.unlock_file(&lock),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for FileLockGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLockGuard")
            .field("lock", &self.lock)
            .finish()
    }
}

impl Drop for FileLockGuard<'_> {
    fn drop(&mut self) {
        if let Some(lock) = self.lock.take() {
            if let Err(e) = self.service.unlock_file(&lock) {
                handlers::handle_error(&e.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::InMemoryLockRepository;
    use crate::model::Folder;

    fn setup() -> (LockService, Arc<InMemoryLockRepository>, File) {
        let repo = Arc::new(InMemoryLockRepository::new());
        let service = LockService::new(repo.clone(), Duration::from_millis(100));
        let file = File::new(Folder::new([".", "target", "lock"]), "test.txt");
        (service, repo, file)
    }

    #[test]
    fn test_two_readers_coexist() {
        let (service, repo, file) = setup();
        let key = LockKey::new("app", "per", &file);

        let first = service
            .lock_file("user1", "app", "per", Privilege::Read, &file)
            .unwrap();
        let second = service
            .lock_file("user2", "app", "per", Privilege::Read, &file)
            .unwrap();
        assert_eq!(repo.holders(&key).len(), 2);

        first.release().unwrap();
        let remaining = repo.holders(&key);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user, "user2");

        second.release().unwrap();
        assert!(repo.is_empty());
    }

    #[test]
    fn test_write_rejected_while_read_held() {
        let (service, repo, file) = setup();
        let _reader = service
            .lock_file("user1", "app", "per", Privilege::Read, &file)
            .unwrap();

        let err = service
            .lock_file("user2", "app", "per", Privilege::Write, &file)
            .unwrap_err();
        assert_eq!(err.holder(), Some("user1"));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_read_rejected_while_write_held() {
        let (service, _, file) = setup();
        let _writer = service
            .lock_file("user1", "app", "per", Privilege::Write, &file)
            .unwrap();

        let err = service
            .lock_file("user2", "app", "per", Privilege::Read, &file)
            .unwrap_err();
        assert!(matches!(err, LockError::AlreadyLocked { ref holder, .. } if holder == "user1"));
    }

    #[test]
    fn test_keys_are_independent() {
        let (service, _, file) = setup();
        let other = File::new(file.folder_handle(), "other.txt");

        let _a = service
            .lock_file("user1", "app", "per", Privilege::Write, &file)
            .unwrap();
        assert!(service
            .lock_file("user2", "app", "per", Privilege::Write, &other)
            .is_ok());
        assert!(service
            .lock_file("user2", "app", "other", Privilege::Write, &file)
            .is_ok());
    }

    #[test]
    fn test_drop_releases_hold() {
        let (service, repo, file) = setup();
        {
            let _guard = service
                .lock_file("user1", "app", "per", Privilege::Write, &file)
                .unwrap();
            assert_eq!(repo.len(), 1);
        }
        assert!(repo.is_empty());
    }

    #[test]
    fn test_timeout_when_primitive_unavailable() {
        let (service, repo, file) = setup();
        let _held = repo.try_lock(Duration::from_millis(10)).unwrap();

        std::thread::scope(|s| {
            let err = s
                .spawn(|| {
                    service
                        .lock_file("user1", "app", "per", Privilege::Read, &file)
                        .map(|_| ())
                })
                .join()
                .unwrap()
                .unwrap_err();
            assert!(err.is_timeout());
            assert_eq!(err.phase(), LockPhase::Acquire);
        });
    }
}
