//! # Git Module
//!
//! This module contains functionality for interacting with git repositories:
//! finding the repository root and listing the files a branch changed.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use git2::{Delta, Repository};
use tracing::debug;

use crate::verbose_log;

/// Source of the files changed on a branch.
///
/// [`GitRepository`] is the real implementation; tests substitute their own.
pub trait ChangedFiles {
  /// Name of the currently checked out branch.
  fn active_branch(&self) -> Result<String>;

  /// Files added or modified on `branch` since it forked from the base branch.
  /// Deleted files are never listed.
  fn changed_in_branch(&self, branch: &str) -> Result<Vec<PathBuf>>;
}

/// A git repository together with the base branch that branches are compared
/// against.
pub struct GitRepository {
  repo: Repository,
  base: String,
}

impl GitRepository {
  /// Opens the repository containing `path`.
  ///
  /// # Errors
  ///
  /// Returns an error if `path` is not inside a non-bare git repository.
  pub fn discover(path: &Path, base: impl Into<String>) -> Result<Self> {
    let repo = Repository::discover(path)
      .with_context(|| format!("Failed to open git repository at {}", path.display()))?;
    if repo.workdir().is_none() {
      bail!("Git repository at {} has no working directory", path.display());
    }
    Ok(Self {
      repo,
      base: base.into(),
    })
  }

  /// Root of the working tree.
  pub fn root(&self) -> &Path {
    self.repo.workdir().unwrap_or_else(|| self.repo.path())
  }

  fn resolve_commit(&self, reference: &str) -> Result<git2::Commit<'_>> {
    self
      .repo
      .revparse_single(reference)
      .with_context(|| format!("Failed to find git reference: {}", reference))?
      .peel_to_commit()
      .with_context(|| format!("Failed to get commit for reference: {}", reference))
  }
}

impl ChangedFiles for GitRepository {
  fn active_branch(&self) -> Result<String> {
    let head = self.repo.head().context("Failed to get HEAD reference")?;
    if !head.is_branch() {
      bail!("HEAD is detached; pass a branch name explicitly");
    }
    head
      .shorthand()
      .map(str::to_string)
      .context("Branch name is not valid UTF-8")
  }

  fn changed_in_branch(&self, branch: &str) -> Result<Vec<PathBuf>> {
    verbose_log!("Getting files changed on {} relative to {}", branch, self.base);

    let branch_commit = self.resolve_commit(branch)?;
    let base_commit = self.resolve_commit(&self.base)?;

    let fork_point = self
      .repo
      .merge_base(base_commit.id(), branch_commit.id())
      .with_context(|| format!("Branches {} and {} share no history", branch, self.base))?;
    debug!("Fork point of {} and {}: {}", branch, self.base, fork_point);

    let fork_tree = self
      .repo
      .find_commit(fork_point)
      .and_then(|commit| commit.tree())
      .context("Failed to get tree for fork point")?;
    let branch_tree = branch_commit.tree().context("Failed to get tree for branch")?;

    let diff = self
      .repo
      .diff_tree_to_tree(Some(&fork_tree), Some(&branch_tree), None)
      .context("Failed to create diff between fork point and branch")?;

    let root = self.root();
    let mut changed_files = BTreeSet::new();
    for delta in diff.deltas() {
      if matches!(delta.status(), Delta::Deleted | Delta::Unreadable) {
        continue;
      }
      if let Some(path) = delta.new_file().path() {
        verbose_log!("Changed file: {}", path.display());
        changed_files.insert(root.join(path));
      }
    }

    verbose_log!("Found {} changed files", changed_files.len());
    Ok(changed_files.into_iter().collect())
  }
}

/// Root of the git working tree containing `path`, if any.
pub fn discover_repo_root(path: &Path) -> Option<PathBuf> {
  Repository::discover(path)
    .ok()
    .and_then(|repo| repo.workdir().map(Path::to_path_buf))
}
