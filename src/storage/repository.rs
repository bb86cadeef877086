//! File storage contract
//!
//! Enumeration and byte-level access to files namespaced by
//! (application, perimeter). Existence is derived from the listings.

use std::collections::HashSet;

use crate::error::StorageError;
use crate::model::{File, Folder};

pub trait FileRepository: Send + Sync {
    fn get_folders(&self, application: &str, perimeter: &str)
    -> Result<HashSet<Folder>, StorageError>;

    fn get_files(
        &self,
        application: &str,
        perimeter: &str,
        folder: &Folder,
    ) -> Result<HashSet<File>, StorageError>;

    /// Current content, or `None` when the file does not exist.
    fn read(
        &self,
        application: &str,
        perimeter: &str,
        file: &File,
    ) -> Result<Option<Vec<u8>>, StorageError>;

    /// Creates or fully overwrites the file.
    fn write(
        &self,
        application: &str,
        perimeter: &str,
        file: &File,
        content: &[u8],
    ) -> Result<(), StorageError>;

    /// Existing bytes followed by `content`, no separator.
    fn append(
        &self,
        application: &str,
        perimeter: &str,
        file: &File,
        content: &[u8],
    ) -> Result<(), StorageError> {
        let mut combined = self.read(application, perimeter, file)?.unwrap_or_default();
        combined.extend_from_slice(content);
        self.write(application, perimeter, file, &combined)
    }

    fn is_folder_found(
        &self,
        application: &str,
        perimeter: &str,
        folder: &Folder,
    ) -> Result<bool, StorageError> {
        Ok(self.get_folders(application, perimeter)?.contains(folder))
    }

    fn is_file_found(
        &self,
        application: &str,
        perimeter: &str,
        file: &File,
    ) -> Result<bool, StorageError> {
        Ok(self
            .get_files(application, perimeter, file.folder())?
            .contains(file))
    }
}
