//! # check-license
//!
//! Checks and updates the copyright notices of source files.

mod cli;

use anyhow::Result;

use crate::cli::{Cli, run_check};

fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run_check(cli.check_args)
}
