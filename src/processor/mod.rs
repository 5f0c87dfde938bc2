//! # Processor Module
//!
//! This module contains the per-file pipeline and the batch processor that
//! runs it over many files.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - File reading and writing operations
//! - [`file_record`] - A file's parsed copyright header plus its body
//! - [`file_collector`] - Expansion of command-line paths into files
//!
//! The [`LicenseChecker`] is the main entry point. It never stops at the first
//! broken file: every failure is handed to the [`Reporter`], recorded in the
//! file reports and the batch moves on to the next file.

mod file_collector;
mod file_io;
mod file_record;

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::Result;
pub use file_collector::collect_files;
pub use file_io::FileIO;
pub use file_record::{COMMENT_MARKER, FileRecord};
use tracing::{debug, warn};

use crate::config::DEFAULT_OWNER;
use crate::diff::DiffManager;
use crate::error::LicenseError;
use crate::file_filter::{ExtensionFilter, FileFilter};
use crate::git::ChangedFiles;
use crate::report::{FileReport, FileStatus};
use crate::verbose_log;

/// Receives one message per failing file.
pub trait Reporter {
  fn report(&self, message: &str);
}

/// Reporter that only emits a `tracing` event.
pub struct LogReporter;

impl Reporter for LogReporter {
  fn report(&self, message: &str) {
    warn!("{}", message);
  }
}

/// Configuration for creating a [`LicenseChecker`].
pub struct LicenseCheckerConfig {
  /// Designated owner whose notice is checked and updated.
  pub owner: String,
  pub reporter: Box<dyn Reporter>,
  pub diff_manager: Option<DiffManager>,
  /// Source of changed files for the branch operations.
  pub changed_files: Option<Box<dyn ChangedFiles>>,
  /// Filter applied to branch changes.
  pub file_filter: Box<dyn FileFilter>,
}

impl LicenseCheckerConfig {
  /// Creates a config for `owner` with sensible defaults.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// LicenseCheckerConfig {
  ///     changed_files: Some(Box::new(repo)),
  ///     ..LicenseCheckerConfig::new("Forecasting Technologies LTD")
  /// }
  /// ```
  pub fn new(owner: impl Into<String>) -> Self {
    Self {
      owner: owner.into(),
      reporter: Box::new(LogReporter),
      diff_manager: None,
      changed_files: None,
      file_filter: Box::new(ExtensionFilter::from_cli(vec!["rs".to_string()], Vec::new())),
    }
  }
}

impl Default for LicenseCheckerConfig {
  fn default() -> Self {
    Self::new(DEFAULT_OWNER)
  }
}

/// Checks and updates the copyright headers of batches of files.
pub struct LicenseChecker {
  owner: String,
  reporter: Box<dyn Reporter>,
  diff_manager: Option<DiffManager>,
  changed_files: Option<Box<dyn ChangedFiles>>,
  file_filter: Box<dyn FileFilter>,

  /// One report per processed file, in processing order.
  file_reports: RefCell<Vec<FileReport>>,
}

impl LicenseChecker {
  pub fn new(config: LicenseCheckerConfig) -> Self {
    Self {
      owner: config.owner,
      reporter: config.reporter,
      diff_manager: config.diff_manager.filter(DiffManager::is_enabled),
      changed_files: config.changed_files,
      file_filter: config.file_filter,
      file_reports: RefCell::new(Vec::new()),
    }
  }

  pub fn owner(&self) -> &str {
    &self.owner
  }

  /// Checks every file in `paths` against `year`.
  ///
  /// Returns `true` if at least one file failed.
  pub fn check_files<P: AsRef<Path>>(&self, year: u32, paths: &[P]) -> bool {
    let mut failed = false;
    for path in paths {
      let path = path.as_ref();
      verbose_log!("Checking file: {}", path.display());
      match self.check_file(path, year) {
        Ok(()) => self.record(FileReport::new(path, FileStatus::Ok)),
        Err(err) => {
          failed = true;
          self.fail(&err);
        }
      }
    }
    failed
  }

  /// Updates every file in `paths` so that the owner's notice covers `year`.
  ///
  /// Returns whether at least one file failed and how many files were
  /// rewritten.
  pub fn update_files<P: AsRef<Path>>(&self, year: u32, paths: &[P]) -> (bool, usize) {
    let mut failed = false;
    let mut changed = 0;
    for path in paths {
      let path = path.as_ref();
      verbose_log!("Updating file: {}", path.display());
      match self.update_file(path, year) {
        Ok(true) => {
          changed += 1;
          self.record(FileReport::new(path, FileStatus::Updated));
        }
        Ok(false) => self.record(FileReport::new(path, FileStatus::Ok)),
        Err(err) => {
          failed = true;
          self.fail(&err);
        }
      }
    }
    (failed, changed)
  }

  /// Checks the files changed on `branch`, or on the active branch if `None`.
  pub fn check_branch(&self, year: u32, branch: Option<&str>) -> Result<bool> {
    let files = self.files_from_branch(branch)?;
    Ok(self.check_files(year, &files))
  }

  /// Updates the files changed on `branch`, or on the active branch if `None`.
  pub fn update_branch(&self, year: u32, branch: Option<&str>) -> Result<(bool, usize)> {
    let files = self.files_from_branch(branch)?;
    Ok(self.update_files(year, &files))
  }

  /// Files changed on `branch` that pass the file filter.
  pub fn files_from_branch(&self, branch: Option<&str>) -> Result<Vec<PathBuf>> {
    let Some(changed_files) = self.changed_files.as_deref() else {
      anyhow::bail!("Branch mode requires a git repository");
    };

    let branch = match branch {
      Some(branch) => branch.to_string(),
      None => changed_files.active_branch()?,
    };
    debug!("Collecting files changed on branch {}", branch);

    let files: Vec<PathBuf> = changed_files
      .changed_in_branch(&branch)?
      .into_iter()
      .filter(|path| self.file_filter.accepts(path))
      .collect();

    verbose_log!("{} files to process on branch {}", files.len(), branch);
    Ok(files)
  }

  /// Takes the reports collected so far, leaving the collection empty.
  pub fn take_reports(&self) -> Vec<FileReport> {
    self.file_reports.take()
  }

  fn check_file(&self, path: &Path, year: u32) -> Result<(), LicenseError> {
    let mut record = FileRecord::new(path);
    record.read()?;

    let result = record.check(&self.owner, year);
    if result.is_err()
      && let Some(diff_manager) = &self.diff_manager
    {
      let mut preview = record.clone();
      if let Ok(true) = preview.update_license(&self.owner, year) {
        self.show_diff(diff_manager, &record, &preview);
      }
    }
    result
  }

  fn update_file(&self, path: &Path, year: u32) -> Result<bool, LicenseError> {
    let mut record = FileRecord::new(path);
    record.read()?;

    let original = self.diff_manager.as_ref().map(|_| record.clone());
    let changed = record.update_license(&self.owner, year)?;
    if !changed {
      return Ok(false);
    }

    if let (Some(diff_manager), Some(original)) = (&self.diff_manager, &original) {
      self.show_diff(diff_manager, original, &record);
    }
    record.write()?;
    debug!("Updated copyright notice in {}", path.display());
    Ok(true)
  }

  fn show_diff(&self, diff_manager: &DiffManager, before: &FileRecord, after: &FileRecord) {
    if let Err(e) = diff_manager.display_diff(before.path(), &before.render(), &after.render()) {
      warn!("Failed to render diff for {}: {:#}", before.path().display(), e);
    }
  }

  fn fail(&self, err: &LicenseError) {
    debug!(status = ?FileStatus::from(err), "{}", err);
    self.reporter.report(&err.to_string());
    self.record(FileReport::failed(err));
  }

  fn record(&self, report: FileReport) {
    self.file_reports.borrow_mut().push(report);
  }
}

#[cfg(test)]
mod tests {
  use std::fs;
  use std::rc::Rc;

  use tempfile::{TempDir, tempdir};

  use super::*;

  const OWNER: &str = "Forecasting Technologies LTD";

  #[derive(Clone, Default)]
  struct RecordingReporter(Rc<RefCell<Vec<String>>>);

  impl Reporter for RecordingReporter {
    fn report(&self, message: &str) {
      self.0.borrow_mut().push(message.to_string());
    }
  }

  struct FakeBranches {
    active: &'static str,
    files: Vec<PathBuf>,
  }

  impl ChangedFiles for FakeBranches {
    fn active_branch(&self) -> Result<String> {
      Ok(self.active.to_string())
    }

    fn changed_in_branch(&self, branch: &str) -> Result<Vec<PathBuf>> {
      if branch == self.active {
        Ok(self.files.clone())
      } else {
        anyhow::bail!("unknown branch {branch}")
      }
    }
  }

  fn checker(reporter: &RecordingReporter) -> LicenseChecker {
    LicenseChecker::new(LicenseCheckerConfig {
      reporter: Box::new(reporter.clone()),
      ..LicenseCheckerConfig::new(OWNER)
    })
  }

  fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write fixture");
    path
  }

  const VALID: &str = "// Copyright 2022-2023 Forecasting Technologies LTD.\n//\n// License\n\nfn main() {}\n";
  const OUTDATED: &str = "// Copyright 2022 Forecasting Technologies LTD.\n// Copyright 2021 Zeitgeist PM LLC.\n//\n// License\n";
  const DUPLICATE: &str =
    "// Copyright 2023 Forecasting Technologies LTD.\n// Copyright 2022 Forecasting Technologies LTD.\n//\n";

  #[test]
  fn test_check_files_continues_after_failure() {
    let dir = tempdir().unwrap();
    let paths = vec![
      write_file(&dir, "a.rs", VALID),
      write_file(&dir, "b.rs", DUPLICATE),
      write_file(&dir, "c.rs", VALID),
    ];
    let reporter = RecordingReporter::default();
    let checker = checker(&reporter);

    assert!(checker.check_files(2023, &paths));

    let messages = reporter.0.borrow();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("b.rs"));
    assert!(messages[0].contains("duplicate"));

    let reports = checker.take_reports();
    let statuses: Vec<_> = reports.iter().map(|r| r.status).collect();
    assert_eq!(statuses, vec![FileStatus::Ok, FileStatus::Duplicate, FileStatus::Ok]);
    assert!(checker.take_reports().is_empty());
  }

  #[test]
  fn test_check_files_all_valid() {
    let dir = tempdir().unwrap();
    let paths = vec![write_file(&dir, "a.rs", VALID)];
    let reporter = RecordingReporter::default();

    assert!(!checker(&reporter).check_files(2023, &paths));
    assert!(reporter.0.borrow().is_empty());
  }

  #[test]
  fn test_check_files_does_not_modify() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "a.rs", OUTDATED);
    let reporter = RecordingReporter::default();

    assert!(checker(&reporter).check_files(2023, &[&path]));
    assert_eq!(fs::read_to_string(&path).unwrap(), OUTDATED);
    assert!(reporter.0.borrow()[0].contains("outdated"));
  }

  #[test]
  fn test_check_files_missing_file() {
    let reporter = RecordingReporter::default();
    let checker = checker(&reporter);

    assert!(checker.check_files(2023, &["does/not/exist.rs"]));
    assert_eq!(checker.take_reports()[0].status, FileStatus::Unreadable);
  }

  #[test]
  fn test_update_files() {
    let dir = tempdir().unwrap();
    let valid = write_file(&dir, "valid.rs", VALID);
    let outdated = write_file(&dir, "outdated.rs", OUTDATED);
    let bare = write_file(&dir, "bare.rs", "fn main() {}\n");
    let broken = write_file(&dir, "broken.rs", "// Copyright whenever Someone.\n//\n");
    let reporter = RecordingReporter::default();
    let checker = checker(&reporter);

    let (failed, changed) = checker.update_files(2023, &[&valid, &outdated, &bare, &broken]);

    assert!(failed);
    assert_eq!(changed, 2);
    assert_eq!(fs::read_to_string(&valid).unwrap(), VALID);
    assert_eq!(
      fs::read_to_string(&outdated).unwrap(),
      "// Copyright 2022-2023 Forecasting Technologies LTD.\n// Copyright 2021 Zeitgeist PM LLC.\n//\n// License\n"
    );
    assert_eq!(
      fs::read_to_string(&bare).unwrap(),
      "// Copyright 2023 Forecasting Technologies LTD.\nfn main() {}\n"
    );
    assert_eq!(
      fs::read_to_string(&broken).unwrap(),
      "// Copyright whenever Someone.\n//\n"
    );

    let messages = reporter.0.borrow();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("broken.rs:1"));

    let statuses: Vec<_> = checker.take_reports().iter().map(|r| r.status).collect();
    assert_eq!(
      statuses,
      vec![FileStatus::Ok, FileStatus::Updated, FileStatus::Updated, FileStatus::Illegal]
    );
  }

  #[test]
  fn test_update_then_check_passes() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "a.rs", OUTDATED);
    let reporter = RecordingReporter::default();
    let checker = checker(&reporter);

    assert_eq!(checker.update_files(2025, &[&path]), (false, 1));
    assert!(!checker.check_files(2025, &[&path]));
    assert_eq!(checker.update_files(2025, &[&path]), (false, 0));
  }

  #[test]
  fn test_update_files_future_year_fails() {
    let dir = tempdir().unwrap();
    let content = "// Copyright 2022-2030 Forecasting Technologies LTD.\n";
    let path = write_file(&dir, "future.rs", content);
    let reporter = RecordingReporter::default();
    let checker = checker(&reporter);

    assert_eq!(checker.update_files(2024, &[&path]), (true, 0));
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
    assert_eq!(checker.take_reports()[0].status, FileStatus::Future);
  }

  #[test]
  fn test_update_files_with_unwritable_owner_writes_nothing() {
    let dir = tempdir().unwrap();
    let bare = write_file(&dir, "bare.rs", "fn main() {}\n");
    let reporter = RecordingReporter::default();
    let checker = LicenseChecker::new(LicenseCheckerConfig {
      reporter: Box::new(reporter.clone()),
      ..LicenseCheckerConfig::new("Two\nLines")
    });

    assert_eq!(checker.update_files(2024, &[&bare]), (true, 0));
    assert_eq!(fs::read_to_string(&bare).unwrap(), "fn main() {}\n");
    assert_eq!(checker.take_reports()[0].status, FileStatus::Illegal);
    assert!(reporter.0.borrow()[0].contains("illegal owner"));
  }

  #[test]
  fn test_custom_owner() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "a.rs", OUTDATED);
    let checker = LicenseChecker::new(LicenseCheckerConfig::new("Zeitgeist PM LLC"));
    assert_eq!(checker.owner(), "Zeitgeist PM LLC");

    assert!(!checker.check_files(2021, &[&path]));
    assert_eq!(checker.update_files(2022, &[&path]), (false, 1));
    assert!(
      fs::read_to_string(&path)
        .unwrap()
        .contains("// Copyright 2021-2022 Zeitgeist PM LLC.\n")
    );
  }

  #[test]
  fn test_check_branch_filters_files() {
    let dir = tempdir().unwrap();
    let rust = write_file(&dir, "lib.rs", OUTDATED);
    let docs = write_file(&dir, "README.md", "# Readme\n");
    let reporter = RecordingReporter::default();
    let checker = LicenseChecker::new(LicenseCheckerConfig {
      reporter: Box::new(reporter.clone()),
      changed_files: Some(Box::new(FakeBranches {
        active: "feature",
        files: vec![rust.clone(), docs],
      })),
      ..LicenseCheckerConfig::new(OWNER)
    });

    assert_eq!(checker.files_from_branch(None).unwrap(), vec![rust.clone()]);
    assert!(checker.check_branch(2023, None).unwrap());
    assert_eq!(checker.update_branch(2023, Some("feature")).unwrap(), (false, 1));
    assert!(!checker.check_branch(2023, Some("feature")).unwrap());
    assert!(checker.check_branch(2023, Some("other")).is_err());
  }

  #[test]
  fn test_branch_mode_without_repository() {
    let checker = LicenseChecker::new(LicenseCheckerConfig::default());
    assert!(checker.check_branch(2023, None).is_err());
  }

  #[test]
  fn test_update_files_saves_diff() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "a.rs", OUTDATED);
    let diff_path = dir.path().join("changes.diff");
    let checker = LicenseChecker::new(LicenseCheckerConfig {
      diff_manager: Some(DiffManager::new(false, Some(diff_path.clone()))),
      ..LicenseCheckerConfig::new(OWNER)
    });

    assert!(checker.check_files(2023, &[&path]));
    let preview = fs::read_to_string(&diff_path).unwrap();
    assert!(preview.contains("+// Copyright 2022-2023 Forecasting Technologies LTD."));

    fs::write(&diff_path, "").unwrap();
    assert_eq!(checker.update_files(2023, &[&path]), (false, 1));
    let applied = fs::read_to_string(&diff_path).unwrap();
    assert!(applied.contains("-// Copyright 2022 Forecasting Technologies LTD."));
  }
}
