//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use scoped_file_service::auth::StaticDirectory;
use scoped_file_service::lock::{InMemoryLockRepository, LockRepository, LockTable};
use scoped_file_service::storage::{FileRepository, InMemoryFileRepository};
use scoped_file_service::utils::setup_logging;
use scoped_file_service::{
    File, FileService, Folder, Privilege, StorageError, create_file_service,
};

pub const APP: &str = "billing";
pub const PERIMETER: &str = "emea";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    GetFolders,
    GetFiles,
    Read,
    Write,
    Append,
}

/// In-memory storage that counts calls and can slow down writes.
#[derive(Default)]
pub struct CountingFileRepository {
    inner: InMemoryFileRepository,
    calls: Mutex<HashMap<Call, usize>>,
    write_delay: Mutex<Option<Duration>>,
    read_delay: Mutex<Option<Duration>>,
    fail_writes: Mutex<bool>,
}

impl CountingFileRepository {
    pub fn add_folder(&self, folder: Folder) {
        self.inner.add_folder(APP, PERIMETER, folder);
    }

    pub fn set_write_delay(&self, delay: Duration) {
        *self.write_delay.lock() = Some(delay);
    }

    pub fn set_read_delay(&self, delay: Duration) {
        *self.read_delay.lock() = Some(delay);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }

    pub fn calls(&self, call: Call) -> usize {
        self.calls.lock().get(&call).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    pub fn content(&self, file: &File) -> Option<Vec<u8>> {
        self.inner.read(APP, PERIMETER, file).unwrap()
    }

    fn record(&self, call: Call) {
        *self.calls.lock().entry(call).or_default() += 1;
    }
}

impl FileRepository for CountingFileRepository {
    fn get_folders(&self, application: &str, perimeter: &str) -> Result<HashSet<Folder>, StorageError> {
        self.record(Call::GetFolders);
        self.inner.get_folders(application, perimeter)
    }

    fn get_files(
        &self,
        application: &str,
        perimeter: &str,
        folder: &Folder,
    ) -> Result<HashSet<File>, StorageError> {
        self.record(Call::GetFiles);
        self.inner.get_files(application, perimeter, folder)
    }

    fn read(
        &self,
        application: &str,
        perimeter: &str,
        file: &File,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        self.record(Call::Read);
        let delay = *self.read_delay.lock();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }
        self.inner.read(application, perimeter, file)
    }

    fn write(
        &self,
        application: &str,
        perimeter: &str,
        file: &File,
        content: &[u8],
    ) -> Result<(), StorageError> {
        self.record(Call::Write);
        let delay = *self.write_delay.lock();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }
        if *self.fail_writes.lock() {
            return Err(StorageError::IoError(io::Error::other("disk full")));
        }
        self.inner.write(application, perimeter, file, content)
    }

    fn append(
        &self,
        application: &str,
        perimeter: &str,
        file: &File,
        content: &[u8],
    ) -> Result<(), StorageError> {
        self.record(Call::Append);
        let mut combined = self.read(application, perimeter, file)?.unwrap_or_default();
        combined.extend_from_slice(content);
        self.write(application, perimeter, file, &combined)
    }
}

/// Lock storage whose coordination primitive can be made unobtainable
/// after a number of further acquisitions.
pub struct StallingLockRepository {
    inner: Arc<InMemoryLockRepository>,
    remaining: Mutex<Option<usize>>,
}

impl StallingLockRepository {
    pub fn new(inner: Arc<InMemoryLockRepository>) -> Self {
        Self {
            inner,
            remaining: Mutex::new(None),
        }
    }

    /// The next `count` acquisitions succeed, later ones time out.
    pub fn stall_after(&self, count: usize) {
        *self.remaining.lock() = Some(count);
    }

    pub fn resume(&self) {
        *self.remaining.lock() = None;
    }
}

impl LockRepository for StallingLockRepository {
    fn try_lock(&self, timeout: Duration) -> Option<Box<dyn LockTable + '_>> {
        {
            let mut remaining = self.remaining.lock();
            match remaining.as_mut() {
                Some(0) => {
                    thread::sleep(timeout);
                    return None;
                }
                Some(count) => *count -= 1,
                None => {}
            }
        }
        self.inner.try_lock(timeout)
    }
}

pub struct Fixture {
    pub directory: Arc<StaticDirectory>,
    pub files: Arc<CountingFileRepository>,
    pub locks: Arc<InMemoryLockRepository>,
    pub primitive: Arc<StallingLockRepository>,
    pub service: Arc<FileService>,
}

impl Fixture {
    /// alice: WRITE, bob: READ, carol: no rights, all on (billing, emea).
    pub fn new(timeout: Duration) -> Self {
        setup_logging();

        let directory = Arc::new(StaticDirectory::new());
        for user in ["alice", "bob", "carol"] {
            directory.add_user(user);
        }
        directory.add_perimeter(APP, PERIMETER);
        directory.add_perimeter(APP, "apac");
        directory.grant("alice", APP, PERIMETER, Privilege::Write);
        directory.grant("bob", APP, PERIMETER, Privilege::Read);

        let files = Arc::new(CountingFileRepository::default());
        let locks = Arc::new(InMemoryLockRepository::new());
        let primitive = Arc::new(StallingLockRepository::new(locks.clone()));
        let service = Arc::new(create_file_service(
            directory.clone(),
            directory.clone(),
            directory.clone(),
            files.clone(),
            primitive.clone(),
            timeout,
        ));

        Self {
            directory,
            files,
            locks,
            primitive,
            service,
        }
    }
}

pub fn docs() -> Folder {
    Folder::parse("docs")
}

pub fn file(name: &str) -> File {
    File::new(docs(), name)
}
