//! Lock table entries

use crate::auth::Privilege;
use crate::model::File;

/// Addresses exactly one lock slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockKey {
    pub application: String,
    pub perimeter: String,
    pub file: File,
}

impl LockKey {
    pub fn new(application: &str, perimeter: &str, file: &File) -> Self {
        Self {
            application: application.to_string(),
            perimeter: perimeter.to_string(),
            file: file.clone(),
        }
    }
}

/// One registered hold on a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileLock {
    pub key: LockKey,
    pub user: String,
    pub privilege: Privilege,
}

impl FileLock {
    pub fn new(key: LockKey, user: &str, privilege: Privilege) -> Self {
        Self {
            key,
            user: user.to_string(),
            privilege,
        }
    }

    /// Two holds may coexist only when both are READ.
    pub fn is_compatible_with(&self, other: &FileLock) -> bool {
        self.privilege == Privilege::Read && other.privilege == Privilege::Read
    }
}
