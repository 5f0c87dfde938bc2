//! # File I/O Module
//!
//! File reading and writing utilities for the processor.

use std::fs;
use std::io::{self, Write as _};
use std::path::Path;

use tempfile::NamedTempFile;

/// File I/O operations for the processor.
///
/// This struct provides static methods for reading and writing files.
pub struct FileIO;

impl FileIO {
  /// Read full file content.
  ///
  /// Fails with [`io::ErrorKind::InvalidData`] if the file is not UTF-8.
  pub fn read_full_content(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
  }

  /// Replace the content of `path`.
  ///
  /// The content is written to a temporary file next to `path` which is then
  /// renamed over it, so readers never observe a half-written file. The
  /// permissions of an existing file are carried over.
  pub fn write_file(path: &Path, content: &str) -> io::Result<()> {
    let dir = path
      .parent()
      .filter(|parent| !parent.as_os_str().is_empty())
      .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;

    if let Ok(metadata) = fs::metadata(path) {
      fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
  }
}
