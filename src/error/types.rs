//! Error types
//!
//! Defines the error taxonomy for validation, locking and storage.

use std::fmt;
use std::io;
use std::time::Duration;

use crate::auth::Privilege;
use crate::model::{File, Folder};

/// Which side of a guarded operation a lock error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockPhase {
    Acquire,
    Release,
}

impl fmt::Display for LockPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockPhase::Acquire => write!(f, "lock"),
            LockPhase::Release => write!(f, "unlock"),
        }
    }
}

/// Lock module errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    /// Another record is registered for the key and is incompatible.
    AlreadyLocked {
        user: String,
        application: String,
        perimeter: String,
        privilege: Privilege,
        file: File,
        holder: String,
    },
    /// The coordination primitive could not be obtained in time.
    Timeout {
        user: String,
        application: String,
        perimeter: String,
        privilege: Privilege,
        file: File,
        phase: LockPhase,
        timeout: Duration,
    },
}

impl LockError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LockError::Timeout { .. })
    }

    /// User currently holding the lock, for contention errors.
    pub fn holder(&self) -> Option<&str> {
        match self {
            LockError::AlreadyLocked { holder, .. } => Some(holder),
            LockError::Timeout { .. } => None,
        }
    }

    pub fn phase(&self) -> LockPhase {
        match self {
            LockError::AlreadyLocked { .. } => LockPhase::Acquire,
            LockError::Timeout { phase, .. } => *phase,
        }
    }
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockError::AlreadyLocked {
                user,
                application,
                perimeter,
                privilege,
                file,
                holder,
            } => write!(
                f,
                "User '{}' cannot {} the file '{}' for application '{}' and perimeter '{}' because this file is already locked by user '{}'",
                user,
                privilege.action(),
                file.path(),
                application,
                perimeter,
                holder
            ),
            LockError::Timeout {
                user,
                application,
                perimeter,
                privilege,
                file,
                phase,
                timeout,
            } => write!(
                f,
                "User '{}' cannot {} the file '{}' for application '{}' and perimeter '{}' because the timeout exceeded during {} ({:?})",
                user,
                privilege.action(),
                file.path(),
                application,
                perimeter,
                phase,
                timeout
            ),
        }
    }
}

impl std::error::Error for LockError {}

/// Storage collaborator errors
#[derive(Debug)]
pub enum StorageError {
    InvalidPath(String),
    IoError(io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::InvalidPath(p) => write!(f, "Invalid path: {}", p),
            StorageError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(e) => Some(e),
            StorageError::InvalidPath(_) => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::IoError(error)
    }
}

/// Errors surfaced by the file service
#[derive(Debug)]
pub enum ServiceError {
    UserNotFound {
        user: String,
    },
    ApplicationNotFound {
        application: String,
    },
    PerimeterNotFound {
        application: String,
        perimeter: String,
    },
    Unauthorized {
        user: String,
        application: String,
        perimeter: String,
        privilege: Privilege,
    },
    FolderNotFound {
        application: String,
        perimeter: String,
        folder: Folder,
    },
    FileNotFound {
        application: String,
        perimeter: String,
        file: File,
    },
    /// The file exists although the operation requires it not to.
    FileFound {
        application: String,
        perimeter: String,
        file: File,
    },
    Lock(LockError),
    Storage(StorageError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::UserNotFound { user } => write!(f, "User '{}' is not found", user),
            ServiceError::ApplicationNotFound { application } => {
                write!(f, "Application '{}' is not found", application)
            }
            ServiceError::PerimeterNotFound {
                application,
                perimeter,
            } => write!(
                f,
                "Perimeter '{}' is not found for application '{}'",
                perimeter, application
            ),
            ServiceError::Unauthorized {
                user,
                application,
                perimeter,
                privilege,
            } => write!(
                f,
                "User '{}' is not authorized to {} files on application '{}' and perimeter '{}'",
                user,
                privilege.action(),
                application,
                perimeter
            ),
            ServiceError::FolderNotFound {
                application,
                perimeter,
                folder,
            } => write!(
                f,
                "Folder '{}' is not found for application '{}' and perimeter '{}'",
                folder.path(),
                application,
                perimeter
            ),
            ServiceError::FileNotFound {
                application,
                perimeter,
                file,
            } => write!(
                f,
                "File '{}' is not found for application '{}' and perimeter '{}'",
                file.path(),
                application,
                perimeter
            ),
            ServiceError::FileFound {
                application,
                perimeter,
                file,
            } => write!(
                f,
                "File '{}' should not be found for application '{}' and perimeter '{}'",
                file.path(),
                application,
                perimeter
            ),
            ServiceError::Lock(e) => write!(f, "Lock error: {}", e),
            ServiceError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Lock(e) => Some(e),
            ServiceError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LockError> for ServiceError {
    fn from(error: LockError) -> Self {
        ServiceError::Lock(error)
    }
}

impl From<StorageError> for ServiceError {
    fn from(error: StorageError) -> Self {
        ServiceError::Storage(error)
    }
}
