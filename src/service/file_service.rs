//! File service
//!
//! Entry point for every folder and file operation. Each call runs the
//! validation chain first, then brackets its single storage call with one
//! file lock acquisition and release.

use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;

use crate::auth::{AccessValidator, Privilege};
use crate::error::{ServiceError, handle_error};
use crate::lock::LockService;
use crate::model::{File, Folder};
use crate::storage::FileRepository;

pub struct FileService {
    validator: AccessValidator,
    files: Arc<dyn FileRepository>,
    lock_service: LockService,
}

impl FileService {
    pub fn new(
        validator: AccessValidator,
        files: Arc<dyn FileRepository>,
        lock_service: LockService,
    ) -> Self {
        Self {
            validator,
            files,
            lock_service,
        }
    }

    /// All folders of the (application, perimeter).
    pub fn get_folders(
        &self,
        user: &str,
        application: &str,
        perimeter: &str,
    ) -> Result<HashSet<Folder>, ServiceError> {
        self.validator
            .check_access(user, application, perimeter, Privilege::Read)?;

        Ok(self.files.get_folders(application, perimeter)?)
    }

    /// Files directly inside `folder`.
    pub fn get_files(
        &self,
        user: &str,
        application: &str,
        perimeter: &str,
        folder: &Folder,
    ) -> Result<HashSet<File>, ServiceError> {
        self.validator
            .check_access(user, application, perimeter, Privilege::Read)?;
        self.validator
            .assert_folder_found(application, perimeter, folder)?;

        Ok(self.files.get_files(application, perimeter, folder)?)
    }

    /// Files of every folder, flattened.
    ///
    /// Folders are listed one after another without a lock, so a concurrent
    /// change between two folder listings may be observed only partially.
    pub fn get_all_files(
        &self,
        user: &str,
        application: &str,
        perimeter: &str,
    ) -> Result<HashSet<File>, ServiceError> {
        self.validator
            .check_access(user, application, perimeter, Privilege::Read)?;

        let mut files = HashSet::new();
        for folder in self.files.get_folders(application, perimeter)? {
            files.extend(self.files.get_files(application, perimeter, &folder)?);
        }
        Ok(files)
    }

    pub fn read(
        &self,
        user: &str,
        application: &str,
        perimeter: &str,
        file: &File,
    ) -> Result<Vec<u8>, ServiceError> {
        let privilege = Privilege::Read;
        self.validator
            .check_access(user, application, perimeter, privilege)?;
        self.validator
            .assert_folder_found(application, perimeter, file.folder())?;
        self.validator
            .assert_file_found(application, perimeter, file)?;

        self.with_file_lock(user, application, perimeter, privilege, file, || {
            self.files
                .read(application, perimeter, file)?
                .ok_or_else(|| ServiceError::FileNotFound {
                    application: application.to_string(),
                    perimeter: perimeter.to_string(),
                    file: file.clone(),
                })
        })
    }

    /// Overwrites the file with `content`.
    ///
    /// With `replace_if_found == false` the file must not exist yet.
    pub fn save(
        &self,
        user: &str,
        application: &str,
        perimeter: &str,
        file: &File,
        content: &[u8],
        replace_if_found: bool,
    ) -> Result<(), ServiceError> {
        let privilege = Privilege::Write;
        self.validator
            .check_access(user, application, perimeter, privilege)?;
        self.validator
            .assert_folder_found(application, perimeter, file.folder())?;
        if !replace_if_found {
            self.validator
                .assert_file_not_found(application, perimeter, file)?;
        }

        self.with_file_lock(user, application, perimeter, privilege, file, || {
            self.files.write(application, perimeter, file, content)?;
            info!("User '{user}' saved {file} on {application}/{perimeter}");
            Ok(())
        })
    }

    /// Appends `content` to the file, creating it when missing.
    ///
    /// With `create_if_not_found == false` the file must already exist.
    pub fn append(
        &self,
        user: &str,
        application: &str,
        perimeter: &str,
        file: &File,
        content: &[u8],
        create_if_not_found: bool,
    ) -> Result<(), ServiceError> {
        let privilege = Privilege::Write;
        self.validator
            .check_access(user, application, perimeter, privilege)?;
        self.validator
            .assert_folder_found(application, perimeter, file.folder())?;
        if !create_if_not_found {
            self.validator
                .assert_file_found(application, perimeter, file)?;
        }

        self.with_file_lock(user, application, perimeter, privilege, file, || {
            if self.files.is_file_found(application, perimeter, file)? {
                self.files.append(application, perimeter, file, content)?;
                info!("User '{user}' appended to {file} on {application}/{perimeter}");
            } else {
                self.files.write(application, perimeter, file, content)?;
                info!("User '{user}' created {file} on {application}/{perimeter}");
            }
            Ok(())
        })
    }

    /// Runs `operation` while holding the file lock.
    ///
    /// The lock is released on every path. An operation error takes
    /// precedence over a release error, which is then only logged.
    fn with_file_lock<T>(
        &self,
        user: &str,
        application: &str,
        perimeter: &str,
        privilege: Privilege,
        file: &File,
        operation: impl FnOnce() -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let guard = self
            .lock_service
            .lock_file(user, application, perimeter, privilege, file)?;

        let outcome = operation();
        let released = guard.release();

        match (outcome, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(release_err)) => {
                let err = ServiceError::Lock(release_err);
                handle_error(&err);
                Err(err)
            }
            (Err(err), Ok(())) => {
                debug!("Operation on {file} failed under lock: {err}");
                Err(err)
            }
            (Err(err), Err(release_err)) => {
                handle_error(&ServiceError::Lock(release_err));
                Err(err)
            }
        }
    }
}
