//! # File Filter Module
//!
//! Decides which of the files found by walking a directory or diffing a
//! branch get checked.

use std::collections::HashSet;
use std::path::Path;

use crate::config::ExtensionConfig;
use crate::verbose_log;

/// Result of a file filtering operation.
pub struct FilterResult {
  /// Whether the file should be processed
  pub should_process: bool,
  /// Reason why the file should not be processed (if any)
  pub reason: Option<String>,
}

impl FilterResult {
  /// Creates a new FilterResult indicating the file should be processed.
  pub const fn process() -> Self {
    Self {
      should_process: true,
      reason: None,
    }
  }

  /// Creates a new FilterResult indicating the file should be skipped.
  pub fn skip(reason: impl Into<String>) -> Self {
    Self {
      should_process: false,
      reason: Some(reason.into()),
    }
  }
}

/// Trait for components that filter files based on certain criteria.
pub trait FileFilter {
  /// Determines whether a file should be processed.
  fn should_process(&self, path: &Path) -> FilterResult;

  /// Like [`should_process`](Self::should_process), logging the reason for
  /// every skipped file in verbose mode.
  fn accepts(&self, path: &Path) -> bool {
    let FilterResult { should_process, reason } = self.should_process(path);
    if !should_process
      && let Some(reason) = reason
    {
      verbose_log!("Skipping: {} ({})", path.display(), reason);
    }
    should_process
  }
}

/// Filter on file extensions, compared case-insensitively.
///
/// With an include list only those extensions pass; otherwise everything but
/// the excluded extensions passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
  include: Option<HashSet<String>>,
  exclude: HashSet<String>,
}

impl ExtensionFilter {
  /// Creates a filter from the `[extensions]` config table.
  pub fn new(config: &ExtensionConfig) -> Self {
    Self {
      include: config.include.as_ref().map(|exts| normalize(exts.iter())),
      exclude: normalize(config.exclude.iter()),
    }
  }

  /// Creates a filter from CLI arguments.
  pub fn from_cli(include: Vec<String>, exclude: Vec<String>) -> Self {
    let mut filter = Self::default();
    filter.merge_cli(include, exclude);
    filter
  }

  /// Applies CLI arguments on top of the configured lists. A non-empty
  /// include list from the CLI replaces the configured one.
  pub fn merge_cli(&mut self, include: Vec<String>, exclude: Vec<String>) {
    if !include.is_empty() {
      self.include = Some(normalize(include.iter()));
    }
    self.exclude.extend(normalize(exclude.iter()));
  }

  /// Whether the filter can reject any file at all.
  pub fn is_active(&self) -> bool {
    self.include.is_some() || !self.exclude.is_empty()
  }
}

impl FileFilter for ExtensionFilter {
  fn should_process(&self, path: &Path) -> FilterResult {
    let ext = path
      .extension()
      .map(|ext| ext.to_string_lossy().to_lowercase())
      .unwrap_or_default();

    if self.exclude.contains(&ext) {
      return FilterResult::skip(format!("Extension '{ext}' is excluded"));
    }

    if let Some(ref include) = self.include
      && !include.contains(&ext)
    {
      return FilterResult::skip(format!("Extension '{ext}' is not included"));
    }

    FilterResult::process()
  }
}

fn normalize<'a>(exts: impl Iterator<Item = &'a String>) -> HashSet<String> {
  exts
    .map(|ext| ext.trim_start_matches('.').to_lowercase())
    .collect()
}
