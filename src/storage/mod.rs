//! File storage
//!
//! The storage contract consumed by the file service plus filesystem and
//! in-memory implementations.

pub mod filesystem;
pub mod memory;
pub mod repository;
pub mod validation;

pub use filesystem::FsFileRepository;
pub use memory::InMemoryFileRepository;
pub use repository::FileRepository;
