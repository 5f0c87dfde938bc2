//! # File Collector Module
//!
//! Expands the paths given on the command line into the list of files to
//! process.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::file_filter::FileFilter;

/// Expands `paths` into files.
///
/// Files are kept as given, whatever their extension, since naming a file
/// explicitly is taken as intent. A path that does not exist is kept too and
/// fails on its own when it is read. Directories are walked recursively,
/// skipping hidden directories, and only files accepted by `filter` are kept.
/// The order of `paths` is preserved and directory contents are sorted by name.
///
/// # Errors
///
/// Returns an error if a directory cannot be walked.
pub fn collect_files<P: AsRef<Path>>(paths: &[P], filter: &dyn FileFilter) -> Result<Vec<PathBuf>> {
  let mut files = Vec::new();

  for path in paths {
    let path = path.as_ref();
    if !path.is_dir() {
      if !path.exists() {
        debug!("{} does not exist", path.display());
      }
      files.push(path.to_path_buf());
      continue;
    }

    debug!("Scanning directory: {}", path.display());
    let before = files.len();
    let walker = WalkDir::new(path)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
      let entry = entry.with_context(|| format!("Failed to walk directory {}", path.display()))?;
      if !entry.file_type().is_file() {
        continue;
      }
      if filter.accepts(entry.path()) {
        files.push(entry.into_path());
      }
    }
    debug!("Found {} files in {}", files.len() - before, path.display());
  }

  Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
  entry.file_name().to_string_lossy().starts_with('.')
}
