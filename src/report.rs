//! # Report Module
//!
//! Per-file results of a check or update run, the summary derived from them,
//! and the JSON report written for `--report-json`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use crate::error::LicenseError;

/// Outcome of processing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
  /// The designated owner's notice covers the current year.
  Ok,
  /// The notice was extended or added and the file rewritten. Only recorded in
  /// write mode.
  Updated,
  /// No notices, or no notice for the designated owner.
  Missing,
  /// The same owner appears in several notices.
  Duplicate,
  /// The designated owner's notice ends before the current year.
  Outdated,
  /// The designated owner's notice lists years after the current year.
  Future,
  /// A header line is not a valid copyright notice, or no valid notice can be
  /// written for the designated owner.
  Illegal,
  /// The file could not be read or written.
  Unreadable,
}

impl FileStatus {
  pub const fn is_failure(self) -> bool {
    !matches!(self, Self::Ok | Self::Updated)
  }
}

impl From<&LicenseError> for FileStatus {
  fn from(err: &LicenseError) -> Self {
    match err {
      LicenseError::IllegalCopyright { .. } | LicenseError::InvalidOwner { .. } => Self::Illegal,
      LicenseError::MissingCopyright { .. } => Self::Missing,
      LicenseError::DuplicateCopyright { .. } => Self::Duplicate,
      LicenseError::OutdatedCopyright { .. } => Self::Outdated,
      LicenseError::FutureCopyright { .. } => Self::Future,
      LicenseError::Io { .. } => Self::Unreadable,
    }
  }
}

/// Information about a processed file for reporting
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
  pub path: PathBuf,
  pub status: FileStatus,
  /// Diagnostic for failed files
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl FileReport {
  pub fn new(path: &Path, status: FileStatus) -> Self {
    Self {
      path: path.to_path_buf(),
      status,
      message: None,
    }
  }

  pub fn failed(err: &LicenseError) -> Self {
    Self {
      path: err.path().to_path_buf(),
      status: FileStatus::from(err),
      message: Some(err.to_string()),
    }
  }
}

/// Summary counts over all processed files.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSummary {
  pub total_files: usize,
  pub files_ok: usize,
  pub files_updated: usize,
  pub files_failed: usize,
  #[serde(skip_serializing)]
  pub processing_time: Duration,
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
  pub timestamp: i64,
}

impl ProcessingSummary {
  pub fn from_reports(files: &[FileReport], processing_time: Duration) -> Self {
    let mut summary = Self {
      total_files: files.len(),
      files_ok: 0,
      files_updated: 0,
      files_failed: 0,
      processing_time,
      processing_time_secs: processing_time.as_secs_f64(),
      timestamp: Local::now().timestamp(),
    };

    for file in files {
      match file.status {
        FileStatus::Ok => summary.files_ok += 1,
        FileStatus::Updated => summary.files_updated += 1,
        _ => summary.files_failed += 1,
      }
    }

    summary
  }
}

#[derive(Serialize)]
struct JsonReport<'a> {
  summary: &'a ProcessingSummary,
  files: &'a [FileReport],
}

/// Writes the JSON report to `output_path`.
pub fn write_json_report(output_path: &Path, files: &[FileReport], summary: &ProcessingSummary) -> Result<()> {
  let content = serde_json::to_string_pretty(&JsonReport { summary, files }).context("Failed to serialize report")?;
  fs::write(output_path, content).with_context(|| format!("Failed to write report to {}", output_path.display()))
}
