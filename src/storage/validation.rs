//! Path validation
//!
//! Checks that folder segments and file names are safe to map onto the
//! filesystem below the storage root.

use crate::error::StorageError;
use crate::model::{File, Folder};

/// Suffix of the sibling file a write is staged in before the rename.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Whether `name` has the shape of a staging file (`.<name>.tmp`).
pub fn is_temp_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TEMP_SUFFIX)
}

/// A segment must be non-empty, not `.` or `..`, and contain no separator
/// or NUL byte.
pub fn sanitize_segment(segment: &str) -> Result<&str, StorageError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', '\0'])
    {
        Err(StorageError::InvalidPath(segment.to_string()))
    } else {
        Ok(segment)
    }
}

pub fn validate_folder(folder: &Folder) -> Result<(), StorageError> {
    if folder.segments().is_empty() {
        return Err(StorageError::InvalidPath("Empty folder path".into()));
    }
    for segment in folder.segments() {
        sanitize_segment(segment).map_err(|_| StorageError::InvalidPath(folder.path()))?;
    }
    Ok(())
}

/// File names also may not take the staging file shape, which would be
/// hidden from listings and shared with another file's writes.
pub fn validate_file(file: &File) -> Result<(), StorageError> {
    validate_folder(file.folder())?;
    let name = sanitize_segment(file.name()).map_err(|_| StorageError::InvalidPath(file.path()))?;
    if is_temp_name(name) {
        return Err(StorageError::InvalidPath(file.path()));
    }
    Ok(())
}
