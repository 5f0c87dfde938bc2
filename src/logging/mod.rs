//! # Logging Module
//!
//! check-license writes to the terminal through two channels:
//!
//! - Human-facing progress output. [`verbose_log!`](crate::verbose_log) lines
//!   only appear with `-v` and go to stderr; [`info_log!`](crate::info_log)
//!   lines go to stdout and disappear with `-q`. Both are governed by the
//!   global output mode set once at startup.
//! - Diagnostics from library code, emitted as `tracing` events and rendered
//!   by the subscriber from [`init_tracing`].
//!
//! ```rust
//! use check_license::logging::{is_quiet, set_quiet};
//! use check_license::{info_log, verbose_log};
//!
//! set_quiet();
//! assert!(is_quiet());
//!
//! verbose_log!("not printed: {}", "lib.rs");
//! info_log!("not printed either: {}", "lib.rs");
//! ```

mod modes;

pub use modes::{ColorMode, default_level, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// `eprintln!` that only prints in verbose mode.
#[macro_export]
macro_rules! verbose_log {
  ($($arg:tt)*) => {
    if $crate::logging::is_verbose() {
      eprintln!($($arg)*);
    }
  };
}

/// `println!` that is silenced in quiet mode and highlighted when colors are on.
#[macro_export]
macro_rules! info_log {
  ($($arg:tt)*) => {
    if !$crate::logging::is_quiet() {
      $crate::logging::print_info_log(&format!($($arg)*));
    }
  };
}

#[doc(hidden)]
pub fn print_info_log(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
}
