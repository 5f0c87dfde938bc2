//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing.

mod check;

use std::sync::LazyLock;

pub use check::{CheckArgs, run_check};
use clap::Parser;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Version with the commit hash and date embedded by `build.rs`, when known.
static LONG_VERSION: LazyLock<String> = LazyLock::new(|| {
  let version = env!("CARGO_PKG_VERSION");
  match (option_env!("GIT_HASH"), option_env!("GIT_DATE")) {
    (Some(hash), Some(date)) if !hash.is_empty() && !date.is_empty() => format!("{version} ({hash} {date})"),
    (Some(hash), _) if !hash.is_empty() => format!("{version} ({hash})"),
    _ => version.to_string(),
  }
});

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  long_version = LONG_VERSION.as_str(),
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Check the files changed on the current branch against main
  check-license

  # Extend outdated notices on the current branch
  check-license --write

  # Check a feature branch against develop
  check-license --branch=feature/login --base develop

  # Check explicit files and directories
  check-license src/lib.rs crates/

  # Preview the changes --write would make
  check-license --show-diff src/

  # Write a JSON report of the results
  check-license --report-json report.json src/
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(flatten)]
  pub check_args: CheckArgs,
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
