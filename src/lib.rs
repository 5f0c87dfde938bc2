//! # check-license
//!
//! Checks that the copyright notices at the top of Rust source files are well
//! formed and that the designated owner's notice covers the current year.
//!
//! A file's header is the run of leading `// ` lines, each holding one notice
//! such as `// Copyright 2020-2021, 2023 Forecasting Technologies LTD.`. The
//! header ends at the first line that is only `//` (or at the first line that
//! is not a comment); everything after it is left untouched.
//!
//! ## Features
//!
//! * Check mode reports missing, duplicate, outdated and malformed notices
//! * Write mode extends the owner's year ranges or adds a fresh notice
//! * Branch mode processes only the files changed on a git branch
//! * Diff previews and JSON reports
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use check_license::processor::{LicenseChecker, LicenseCheckerConfig};
//!
//! let checker = LicenseChecker::new(LicenseCheckerConfig::new("Forecasting Technologies LTD"));
//!
//! let failed = checker.check_files(2024, &["src/lib.rs", "src/main.rs"]);
//! if failed {
//!     println!("Some copyright notices need attention");
//! }
//! ```
//!
//! ## Modules
//!
//! * [`years`] and [`copyright`] - The notice grammar
//! * [`processor`] - File records and the batch checker
//! * [`git`] - Files changed on a branch
//! * [`config`] - The `.check-license.toml` configuration file
//! * [`logging`] - Logging utilities for verbose output

pub mod config;
pub mod copyright;
pub mod diff;
pub mod error;
pub mod file_filter;
pub mod git;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod years;
