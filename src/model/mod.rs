//! Path model
//!
//! Folder and file value types addressed inside an (application, perimeter).

pub mod file;
pub mod folder;

pub use file::File;
pub use folder::Folder;
