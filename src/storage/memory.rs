//! In-memory file storage
//!
//! Map-backed `FileRepository`. Folders must be registered with
//! `add_folder` before files can be listed in them.

use log::info;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::repository::FileRepository;
use crate::error::StorageError;
use crate::model::{File, Folder};

type Scope = (String, String);
type FolderContents = HashMap<String, Vec<u8>>;

#[derive(Default)]
pub struct InMemoryFileRepository {
    scopes: RwLock<HashMap<Scope, HashMap<Arc<Folder>, FolderContents>>>,
}

impl InMemoryFileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&self, application: &str, perimeter: &str, folder: Folder) {
        self.scopes
            .write()
            .entry(scope(application, perimeter))
            .or_default()
            .entry(Arc::new(folder))
            .or_default();
    }
}

fn scope(application: &str, perimeter: &str) -> Scope {
    (application.to_string(), perimeter.to_string())
}

impl FileRepository for InMemoryFileRepository {
    fn get_folders(
        &self,
        application: &str,
        perimeter: &str,
    ) -> Result<HashSet<Folder>, StorageError> {
        Ok(self
            .scopes
            .read()
            .get(&scope(application, perimeter))
            .map(|folders| folders.keys().map(|f| (**f).clone()).collect())
            .unwrap_or_default())
    }

    fn get_files(
        &self,
        application: &str,
        perimeter: &str,
        folder: &Folder,
    ) -> Result<HashSet<File>, StorageError> {
        let scopes = self.scopes.read();
        let Some((handle, contents)) = scopes
            .get(&scope(application, perimeter))
            .and_then(|folders| folders.get_key_value(folder))
        else {
            return Ok(HashSet::new());
        };

        Ok(contents
            .keys()
            .map(|name| File::new(Arc::clone(handle), name.clone()))
            .collect())
    }

    fn read(
        &self,
        application: &str,
        perimeter: &str,
        file: &File,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self
            .scopes
            .read()
            .get(&scope(application, perimeter))
            .and_then(|folders| folders.get(file.folder()))
            .and_then(|contents| contents.get(file.name()))
            .cloned())
    }

    fn write(
        &self,
        application: &str,
        perimeter: &str,
        file: &File,
        content: &[u8],
    ) -> Result<(), StorageError> {
        let mut scopes = self.scopes.write();
        let contents = scopes
            .entry(scope(application, perimeter))
            .or_default()
            .entry(file.folder_handle())
            .or_default();
        contents.insert(file.name().to_string(), content.to_vec());

        info!(
            "Wrote {} bytes to {} ({application}/{perimeter})",
            content.len(),
            file.path()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_is_scoped() {
        let repo = InMemoryFileRepository::new();
        let docs = Folder::parse("docs");
        repo.add_folder("billing", "emea", docs.clone());
        repo.write("billing", "emea", &File::new(docs.clone(), "a.txt"), b"a")
            .unwrap();

        assert_eq!(repo.get_folders("billing", "emea").unwrap().len(), 1);
        assert!(repo.get_folders("billing", "apac").unwrap().is_empty());
        assert_eq!(repo.get_files("billing", "emea", &docs).unwrap().len(), 1);
        assert!(repo.get_files("billing", "apac", &docs).unwrap().is_empty());
    }

    #[test]
    fn test_default_append_concatenates() {
        let repo = InMemoryFileRepository::new();
        let file = File::new(Folder::parse("docs"), "log.txt");
        repo.add_folder("a", "p", Folder::parse("docs"));

        repo.append("a", "p", &file, b"first").unwrap();
        repo.append("a", "p", &file, b"second").unwrap();
        assert_eq!(
            repo.read("a", "p", &file).unwrap().as_deref(),
            Some(&b"firstsecond"[..])
        );
    }

    #[test]
    fn test_read_missing_is_none() {
        let repo = InMemoryFileRepository::new();
        let file = File::new(Folder::parse("docs"), "missing.txt");
        assert_eq!(repo.read("a", "p", &file).unwrap(), None);
        assert!(!repo.is_file_found("a", "p", &file).unwrap());
    }
}
