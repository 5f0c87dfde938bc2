//! # Output Module
//!
//! Everything check-license prints to stdout goes through here.
//!
//! Failures are printed as they happen, one line per file, by the
//! [`ConsoleReporter`]. The remaining output frames them: a start line, the
//! list of rewritten files in write mode, a summary line and a hint. With
//! `-q` only the failure lines are left, without symbols or colors, so that
//! the output can be piped.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::processor::Reporter;
use crate::report::{FileReport, FileStatus, ProcessingSummary};

pub mod symbols {
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  pub const FAILURE: &str = "\u{2717}"; // ✗
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Updated files listed before the rest is elided (unless `-v`).
const UPDATED_LIST_LIMIT: usize = 20;

/// [`Reporter`] that prints each failure to stdout as soon as it is reported.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
  fn report(&self, message: &str) {
    if is_quiet() {
      println!("{message}");
    } else {
      println!(
        "{} {}",
        symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
        message.if_supports_color(Stream::Stdout, |s| s.red())
      );
    }
  }
}

pub fn print_start_message(file_count: usize, write_mode: bool) {
  if !is_quiet() {
    println!("{}", start_message(file_count, write_mode));
  }
}

pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Lists the files whose notices were rewritten, relative to `workspace_root`.
pub fn print_updated_files(reports: &[FileReport], workspace_root: Option<&Path>) {
  if is_quiet() {
    return;
  }
  let updated = updated_paths(reports, workspace_root);
  if updated.is_empty() {
    return;
  }

  println!(
    "{} Updated copyright notice in {} {}:",
    symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.yellow()),
    updated.len(),
    files_word(updated.len())
  );

  let shown = if is_verbose() { updated.len() } else { UPDATED_LIST_LIMIT };
  for path in updated.iter().take(shown) {
    println!("  {path}");
  }
  if let Some(hidden) = updated.len().checked_sub(shown).filter(|&rest| rest > 0) {
    println!(
      "  {}",
      format!("... and {hidden} more (use -v to see all)").if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  }
}

pub fn print_all_files_ok() {
  if !is_quiet() {
    println!(
      "{} All copyright notices are up to date.",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
    );
  }
}

/// Prints "Summary: X OK, Y updated, Z failed", with the elapsed time in
/// verbose mode.
pub fn print_summary(summary: &ProcessingSummary) {
  if is_quiet() {
    return;
  }

  let failed = if summary.files_failed > 0 {
    summary.files_failed.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    summary.files_failed.to_string()
  };
  let mut line = format!(
    "Summary: {} OK, {} updated, {} failed",
    summary.files_ok.if_supports_color(Stream::Stdout, |s| s.cyan()),
    summary.files_updated.if_supports_color(Stream::Stdout, |s| s.yellow()),
    failed
  );
  if is_verbose() {
    line.push_str(&format!(" ({:.2}s)", summary.processing_time.as_secs_f64()));
  }
  println!("{line}");
}

pub fn print_hint(message: &str) {
  if !is_quiet() {
    println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
  }
}

fn start_message(file_count: usize, write_mode: bool) -> String {
  let verb = if write_mode { "Updating" } else { "Checking" };
  format!("{verb} {file_count} {}...", files_word(file_count))
}

const fn files_word(count: usize) -> &'static str {
  if count == 1 { "file" } else { "files" }
}

fn updated_paths(reports: &[FileReport], workspace_root: Option<&Path>) -> Vec<String> {
  reports
    .iter()
    .filter(|report| report.status == FileStatus::Updated)
    .map(|report| display_path(&report.path, workspace_root))
    .collect()
}

/// `path` relative to `workspace_root` when it lies inside it.
fn display_path(path: &Path, workspace_root: Option<&Path>) -> String {
  workspace_root
    .and_then(|root| path.strip_prefix(root).ok())
    .unwrap_or(path)
    .display()
    .to_string()
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;

  #[test]
  fn test_start_message() {
    assert_eq!(start_message(1, false), "Checking 1 file...");
    assert_eq!(start_message(0, false), "Checking 0 files...");
    assert_eq!(start_message(12, true), "Updating 12 files...");
  }

  #[test]
  fn test_updated_paths_only_lists_updated_files() {
    let root = PathBuf::from("/repo");
    let reports = vec![
      FileReport::new(Path::new("/repo/src/a.rs"), FileStatus::Ok),
      FileReport::new(Path::new("/repo/src/b.rs"), FileStatus::Updated),
      FileReport::new(Path::new("/repo/src/c.rs"), FileStatus::Missing),
      FileReport::new(Path::new("/elsewhere/d.rs"), FileStatus::Updated),
    ];

    assert_eq!(
      updated_paths(&reports, Some(&root)),
      vec!["src/b.rs".to_string(), "/elsewhere/d.rs".to_string()]
    );
  }

  #[test]
  fn test_display_path_without_root() {
    assert_eq!(display_path(Path::new("src/main.rs"), None), "src/main.rs");
  }
}
