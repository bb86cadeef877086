//! Filesystem storage
//!
//! `FileRepository` backed by a directory tree:
//! `<root>/<application>/<perimeter>/<folder segments...>/<file name>`.
//! Every directory below a perimeter directory is a folder. Writes go
//! through a temporary sibling file renamed over the target; file names of
//! that temporary shape are rejected.

use log::{error, info, warn};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::repository::FileRepository;
use super::validation::{
    TEMP_SUFFIX, is_temp_name, sanitize_segment, validate_file, validate_folder,
};
use crate::error::StorageError;
use crate::model::{File, Folder};

const MAX_RETRIES: u32 = 3;

pub struct FsFileRepository {
    root: PathBuf,
}

impl FsFileRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the storage root if it is missing.
    pub fn ensure_root(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;
        info!("Storage root directory: {}", self.root.display());
        Ok(())
    }

    /// Provisions a folder (and its parents) for an (application, perimeter).
    pub fn create_folder(
        &self,
        application: &str,
        perimeter: &str,
        folder: &Folder,
    ) -> Result<(), StorageError> {
        let path = self.folder_path(application, perimeter, folder)?;
        fs::create_dir_all(&path)?;
        info!("Created folder {} (real: {})", folder, path.display());
        Ok(())
    }

    fn scope_path(&self, application: &str, perimeter: &str) -> Result<PathBuf, StorageError> {
        Ok(self
            .root
            .join(sanitize_segment(application)?)
            .join(sanitize_segment(perimeter)?))
    }

    fn folder_path(
        &self,
        application: &str,
        perimeter: &str,
        folder: &Folder,
    ) -> Result<PathBuf, StorageError> {
        validate_folder(folder)?;
        let mut path = self.scope_path(application, perimeter)?;
        path.extend(folder.segments());
        Ok(path)
    }

    fn file_path(
        &self,
        application: &str,
        perimeter: &str,
        file: &File,
    ) -> Result<PathBuf, StorageError> {
        validate_file(file)?;
        Ok(self
            .folder_path(application, perimeter, file.folder())?
            .join(file.name()))
    }

    fn collect_folders(
        dir: &Path,
        prefix: &[String],
        folders: &mut HashSet<Folder>,
    ) -> io::Result<()> {
        for entry in with_retries("list", dir, || fs::read_dir(dir))? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                warn!("Skipping non UTF-8 directory in {}", dir.display());
                continue;
            };

            let mut segments = prefix.to_vec();
            segments.push(name);
            Self::collect_folders(&entry.path(), &segments, folders)?;
            folders.insert(Folder::new(segments));
        }
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}{TEMP_SUFFIX}"))
}

/// Runs `op`, retrying transient permission errors with a linear back-off.
fn with_retries<T>(action: &str, path: &Path, mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if attempt < MAX_RETRIES && e.kind() == io::ErrorKind::PermissionDenied => {
                warn!(
                    "Transient error during {action} of {} (attempt {attempt}/{MAX_RETRIES}): {e}. Retrying...",
                    path.display()
                );
                thread::sleep(Duration::from_millis(100 * attempt as u64));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

impl FileRepository for FsFileRepository {
    fn get_folders(
        &self,
        application: &str,
        perimeter: &str,
    ) -> Result<HashSet<Folder>, StorageError> {
        let scope = self.scope_path(application, perimeter)?;
        let mut folders = HashSet::new();
        if !scope.is_dir() {
            return Ok(folders);
        }

        Self::collect_folders(&scope, &[], &mut folders).map_err(|e| {
            error!("Failed to list folders of {}: {}", scope.display(), e);
            StorageError::from(e)
        })?;
        Ok(folders)
    }

    fn get_files(
        &self,
        application: &str,
        perimeter: &str,
        folder: &Folder,
    ) -> Result<HashSet<File>, StorageError> {
        let dir = self.folder_path(application, perimeter, folder)?;
        if !dir.is_dir() {
            return Ok(HashSet::new());
        }

        let handle = Arc::new(folder.clone());
        let mut files = HashSet::new();
        for entry in with_retries("list", &dir, || fs::read_dir(&dir))? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) if !is_temp_name(name) => {
                    files.insert(File::new(Arc::clone(&handle), name));
                }
                Some(_) => {}
                None => warn!("Skipping non UTF-8 file in {}", dir.display()),
            }
        }
        Ok(files)
    }

    fn read(
        &self,
        application: &str,
        perimeter: &str,
        file: &File,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.file_path(application, perimeter, file)?;
        match with_retries("read", &path, || fs::read(&path)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!("Failed to read {} (real: {}): {}", file, path.display(), e);
                Err(e.into())
            }
        }
    }

    fn write(
        &self,
        application: &str,
        perimeter: &str,
        file: &File,
        content: &[u8],
    ) -> Result<(), StorageError> {
        let path = self.file_path(application, perimeter, file)?;
        let temp = temp_path(&path);

        let result = with_retries("write", &temp, || fs::write(&temp, content))
            .and_then(|_| with_retries("rename", &path, || fs::rename(&temp, &path)));
        if let Err(e) = result {
            error!("Failed to write {} (real: {}): {}", file, path.display(), e);
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        info!(
            "Wrote {} bytes to {} (real: {})",
            content.len(),
            file,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_names_are_hidden_and_reserved() {
        let temp = temp_path(Path::new("/root/docs/a.txt"));
        assert_eq!(temp, PathBuf::from("/root/docs/.a.txt.tmp"));
        assert!(is_temp_name(".a.txt.tmp"));
        assert!(!is_temp_name("a.txt.tmp"));
        assert!(!is_temp_name(".profile"));

        let staged = File::new(Folder::parse("docs"), ".a.txt.tmp");
        let repo = FsFileRepository::new("/tmp/unused-root");
        assert!(matches!(
            repo.write("billing", "emea", &staged, b"x"),
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_scope_rejects_traversal() {
        let repo = FsFileRepository::new("/tmp/unused-root");
        assert!(matches!(
            repo.get_folders("..", "p"),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            repo.get_folders("a", "x/y"),
            Err(StorageError::InvalidPath(_))
        ));
    }
}
