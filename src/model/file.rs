//! Module `file`
//!
//! Defines the `File` value type: a name inside a `Folder`.

use std::fmt;
use std::sync::Arc;

use super::folder::Folder;

/// An immutable file reference.
///
/// The folder is shared, not owned: many files listed from the same folder
/// point at one `Folder` value. Equality is by (folder, name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct File {
    folder: Arc<Folder>,
    name: String,
}

impl File {
    pub fn new(folder: impl Into<Arc<Folder>>, name: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            name: name.into(),
        }
    }

    pub fn folder(&self) -> &Folder {
        &self.folder
    }

    /// Shared handle to the containing folder, for building sibling files.
    pub fn folder_handle(&self) -> Arc<Folder> {
        Arc::clone(&self.folder)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Folder path, `/`, then the file name.
    pub fn path(&self) -> String {
        format!("{}/{}", self.folder.path(), self.name)
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
