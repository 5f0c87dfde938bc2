#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

/// Whether a `git` executable can be started.
pub fn is_git_available() -> bool {
  Command::new("git")
    .arg("--version")
    .output()
    .is_ok_and(|output| output.status.success())
}

/// Runs `git` in `dir`, failing with git's stderr if the command fails.
pub fn run_git(dir: &Path, args: &[&str]) -> Result<()> {
  let output = Command::new("git")
    .args(args)
    .current_dir(dir)
    // Keep the user's global settings (hooks, signing, templates) out of fixtures.
    .env("GIT_CONFIG_GLOBAL", "/dev/null")
    .env("GIT_CONFIG_NOSYSTEM", "1")
    .output()
    .with_context(|| format!("Failed to run git {}", args.join(" ")))?;

  if !output.status.success() {
    bail!(
      "git {} failed in {}: {}",
      args.join(" "),
      dir.display(),
      String::from_utf8_lossy(&output.stderr).trim()
    );
  }
  Ok(())
}

/// Creates a repository in `dir` whose first branch is `main`.
pub fn init_git_repo(dir: &Path) -> Result<()> {
  run_git(dir, &["init", "-q"])?;
  run_git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
  run_git(dir, &["config", "user.name", "Check License Tests"])?;
  run_git(dir, &["config", "user.email", "tests@check-license.invalid"])?;
  run_git(dir, &["config", "commit.gpgsign", "false"])
}

/// Commits whatever is staged in `dir`.
pub fn git_commit(dir: &Path, message: &str) -> Result<()> {
  run_git(dir, &["commit", "-q", "-m", message])
}

/// Stages `file` and commits it.
pub fn git_add_and_commit(dir: &Path, file: &str, message: &str) -> Result<()> {
  run_git(dir, &["add", file])?;
  git_commit(dir, message)
}
