//! # Check Command
//!
//! This module implements the check and write modes of check-license.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use check_license::config::{load_config, validate_owner};
use check_license::diff::DiffManager;
use check_license::file_filter::ExtensionFilter;
use check_license::git::{ChangedFiles, GitRepository, discover_repo_root};
use check_license::info_log;
use check_license::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use check_license::output::{
  ConsoleReporter, print_all_files_ok, print_blank_line, print_hint, print_start_message, print_summary,
  print_updated_files,
};
use check_license::processor::{LicenseChecker, LicenseCheckerConfig, collect_files};
use check_license::report::{FileReport, FileStatus, ProcessingSummary, write_json_report};
use chrono::Datelike;
use clap::Args;
use tracing::{debug, info};

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
  /// Files or directories to process. Directories are processed recursively.
  /// Without paths, the files changed on the current branch are processed.
  #[arg(required = false)]
  pub paths: Vec<PathBuf>,

  /// Extend outdated notices and add missing ones instead of only checking
  #[arg(long, short = 'w')]
  pub write: bool,

  /// Process the files changed on a branch (default: the current branch)
  #[arg(
    long,
    value_name = "NAME",
    num_args = 0..=1,
    require_equals = true,
    conflicts_with = "paths"
  )]
  pub branch: Option<Option<String>>,

  /// Branch that changed files are compared against (default: main)
  #[arg(long, value_name = "REF")]
  pub base: Option<String>,

  /// Owner whose notice must cover the current year
  #[arg(long, value_name = "NAME")]
  pub owner: Option<String>,

  /// Year to check against (default: the current year)
  #[arg(long, value_parser = clap::value_parser!(u32).range(1000..=9999))]
  pub year: Option<u32>,

  /// Show a diff of the header changes
  #[arg(long)]
  pub show_diff: bool,

  /// Save the diff of the header changes to a file
  #[arg(long, short = 'o', value_name = "FILE")]
  pub save_diff: Option<PathBuf>,

  /// Generate a JSON report of the results and save it to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Path to config file (default: .check-license.toml in the workspace root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Only process files with these extensions (repeatable, case-insensitive)
  #[arg(long, value_name = "EXT")]
  pub include_ext: Vec<String>,

  /// Exclude files with these extensions (repeatable, case-insensitive)
  #[arg(long, value_name = "EXT")]
  pub exclude_ext: Vec<String>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except failures
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

/// Run the check command with the given arguments.
///
/// Exits the process with code 1 if any file failed.
pub fn run_check(args: CheckArgs) -> Result<()> {
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let current_dir = std::env::current_dir().context("Failed to get current directory")?;
  let workspace_root = discover_repo_root(&current_dir).unwrap_or(current_dir);
  debug!("Using workspace root: {}", workspace_root.display());

  let config = load_config(args.config.as_deref(), &workspace_root, args.no_config)?;
  let owner = args.owner.unwrap_or(config.owner);
  validate_owner(&owner)?;
  let base = args.base.unwrap_or(config.base_branch);

  let mut file_filter = ExtensionFilter::new(&config.extensions);
  file_filter.merge_cli(args.include_ext, args.exclude_ext);
  if !file_filter.is_active() {
    debug!("Extension filtering is disabled, directories are walked in full");
  }

  let year = args.year.unwrap_or_else(current_year);
  info!("Checking notices of {} against {}", owner, year);

  let diff_manager = DiffManager::new(args.show_diff, args.save_diff);
  diff_manager.init()?;

  let branch_mode = args.paths.is_empty();
  let explicit_files = if branch_mode {
    Vec::new()
  } else {
    collect_files(&args.paths, &file_filter)?
  };

  let changed_files: Option<Box<dyn ChangedFiles>> = if branch_mode {
    let repo = GitRepository::discover(&workspace_root, base)
      .context("Running without paths checks the current branch, which requires a git repository")?;
    Some(Box::new(repo))
  } else {
    None
  };

  let checker = LicenseChecker::new(LicenseCheckerConfig {
    reporter: Box::new(ConsoleReporter),
    diff_manager: Some(diff_manager),
    changed_files,
    file_filter: Box::new(file_filter),
    ..LicenseCheckerConfig::new(owner)
  });

  let files = if branch_mode {
    let branch = args.branch.flatten();
    if let Some(ref name) = branch {
      info_log!("Checking files changed on branch {}", name);
    }
    checker.files_from_branch(branch.as_deref())?
  } else {
    explicit_files
  };

  print_start_message(files.len(), args.write);

  if files.is_empty() {
    print_blank_line();
    print_all_files_ok();
    return Ok(());
  }

  let start_time = Instant::now();

  let failed = if args.write {
    let (failed, changed) = checker.update_files(year, &files);
    debug!("Rewrote {} files", changed);
    failed
  } else {
    checker.check_files(year, &files)
  };

  let elapsed = start_time.elapsed();
  let file_reports = checker.take_reports();
  let summary = ProcessingSummary::from_reports(&file_reports, elapsed);

  print_blank_line();
  if args.write {
    print_updated_files(&file_reports, Some(&workspace_root));
  }
  if !failed {
    print_all_files_ok();
  }

  print_blank_line();
  print_summary(&summary);

  if !args.write && is_fixable(&file_reports) {
    print_blank_line();
    print_hint("Run with --write to add missing notices and extend outdated ones.");
  }

  if let Some(ref output_path) = args.report_json {
    write_report(output_path, &file_reports, &summary);
  }

  if failed {
    process::exit(1);
  }

  Ok(())
}

fn current_year() -> u32 {
  u32::try_from(chrono::Local::now().year()).unwrap_or_default()
}

/// Whether any failure would be fixed by `--write`.
fn is_fixable(file_reports: &[FileReport]) -> bool {
  file_reports
    .iter()
    .any(|report| matches!(report.status, FileStatus::Missing | FileStatus::Outdated))
}

fn write_report(output_path: &Path, file_reports: &[FileReport], summary: &ProcessingSummary) {
  match write_json_report(output_path, file_reports, summary) {
    Ok(()) => info_log!("Generated JSON report at {}", output_path.display()),
    Err(e) => eprintln!("Error generating JSON report: {:#}", e),
  }
}
