//! # Error Module
//!
//! Error types for the two layers of the checker:
//!
//! - [`CopyrightError`] is raised while parsing or mutating a single notice and
//!   knows nothing about files.
//! - [`LicenseError`] is raised by file-level operations and always carries the
//!   path of the offending file.

use std::path::PathBuf;

use crate::copyright::CopyrightNotice;

/// Errors raised by year ranges and copyright notices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CopyrightError {
  /// The text does not follow the year or notice grammar.
  #[error("cannot parse '{0}'")]
  Parse(String),

  /// The years are well-formed but do not describe valid, ordered ranges.
  #[error("illegal year range: {0}")]
  IllegalYearRange(String),

  /// The owner cannot be written into a notice that parses back.
  #[error("illegal owner: {0}")]
  IllegalOwner(String),
}

/// Errors raised while reading, checking or updating a single file.
#[derive(Debug, thiserror::Error)]
pub enum LicenseError {
  /// A header line could not be parsed as a copyright notice.
  #[error("{}:{}: illegal copyright notice '{raw_text}': {source}", .path.display(), .line_index + 1)]
  IllegalCopyright {
    path: PathBuf,
    /// Zero-based index of the line within the header.
    line_index: usize,
    raw_text: String,
    source: CopyrightError,
  },

  /// The file has no notices at all, or none for the designated owner.
  #[error("{}: {}", .path.display(), describe_missing(.owner))]
  MissingCopyright { path: PathBuf, owner: Option<String> },

  /// Two or more notices name the same owner.
  #[error("{}: duplicate copyright notices for '{owner}'", .path.display())]
  DuplicateCopyright { path: PathBuf, owner: String },

  /// The designated owner's notice does not reach the current year.
  #[error("{}: copyright notice '{notice}' is outdated (expected it to cover {current_year})", .path.display())]
  OutdatedCopyright {
    path: PathBuf,
    notice: CopyrightNotice,
    current_year: u32,
  },

  /// The designated owner's notice already lists a year after the current one.
  #[error("{}: copyright notice '{notice}' covers years after {current_year}", .path.display())]
  FutureCopyright {
    path: PathBuf,
    notice: CopyrightNotice,
    current_year: u32,
  },

  /// A notice for the designated owner cannot be created.
  #[error("{}: cannot add a copyright notice: {source}", .path.display())]
  InvalidOwner { path: PathBuf, source: CopyrightError },

  /// The file could not be read or written.
  #[error("{}: {source}", .path.display())]
  Io { path: PathBuf, source: std::io::Error },
}

impl LicenseError {
  /// Path of the file this error belongs to.
  pub fn path(&self) -> &std::path::Path {
    match self {
      Self::IllegalCopyright { path, .. }
      | Self::MissingCopyright { path, .. }
      | Self::DuplicateCopyright { path, .. }
      | Self::OutdatedCopyright { path, .. }
      | Self::FutureCopyright { path, .. }
      | Self::InvalidOwner { path, .. }
      | Self::Io { path, .. } => path,
    }
  }
}

fn describe_missing(owner: &Option<String>) -> String {
  match owner {
    Some(owner) => format!("missing copyright notice for '{owner}'"),
    None => "missing copyright notice".to_string(),
  }
}
