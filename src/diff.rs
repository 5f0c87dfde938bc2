//! # Diff Module
//!
//! Renders the header changes an update makes (or would make) as a unified
//! diff, printed to stderr and/or appended to a diff file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use similar::TextDiff;

/// Number of unchanged lines shown around each change.
const CONTEXT_LINES: usize = 3;

/// Manages diff creation and rendering for copyright header changes.
pub struct DiffManager {
  /// Whether to print diffs to stderr
  pub show_diff: bool,

  /// File that collects the diffs of all processed files
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  /// Whether diffs are rendered at all.
  pub const fn is_enabled(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Truncates the diff file so that a run starts from an empty file.
  pub fn init(&self) -> Result<()> {
    if let Some(ref diff_path) = self.save_diff_path {
      fs::write(diff_path, "").with_context(|| format!("Failed to create diff file: {}", diff_path.display()))?;
    }
    Ok(())
  }

  /// Renders the diff between `original` and `new` for `path`.
  pub fn display_diff(&self, path: &Path, original: &str, new: &str) -> Result<()> {
    let diff = render_diff(path, original, new);

    if self.show_diff {
      for line in diff.lines() {
        if line.starts_with('+') && !line.starts_with("+++") {
          eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.green()));
        } else if line.starts_with('-') && !line.starts_with("---") {
          eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.red()));
        } else {
          eprintln!("{line}");
        }
      }
    }

    if let Some(ref diff_path) = self.save_diff_path {
      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diff_path)
        .with_context(|| format!("Failed to open diff file: {}", diff_path.display()))?;
      file
        .write_all(diff.as_bytes())
        .with_context(|| format!("Failed to write diff file: {}", diff_path.display()))?;
    }

    Ok(())
  }
}

/// Unified diff of `original` against `new`, with `a/` and `b/` headers.
pub fn render_diff(path: &Path, original: &str, new: &str) -> String {
  let old_header = format!("a/{}", path.display());
  let new_header = format!("b/{}", path.display());
  let text_diff = TextDiff::from_lines(original, new);
  let mut unified = text_diff.unified_diff();
  unified.context_radius(CONTEXT_LINES).header(&old_header, &new_header);
  unified.to_string()
}
