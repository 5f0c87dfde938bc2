//! # Years Module
//!
//! An inclusive range of years as it appears in a copyright notice, e.g. the
//! `2020-2022` in `Copyright 2020-2022, 2024 Holder.`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CopyrightError;

static YEARS_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([0-9]{4})(?:-([0-9]{4}))?$").expect("years regex must compile"));

/// An inclusive range of years with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearRange {
  start: u32,
  end: u32,
}

impl YearRange {
  /// Creates a range covering `start..=end`.
  ///
  /// # Errors
  ///
  /// Returns [`CopyrightError::IllegalYearRange`] if `start > end`.
  pub fn new(start: u32, end: u32) -> Result<Self, CopyrightError> {
    if start > end {
      return Err(CopyrightError::IllegalYearRange(format!("{start}-{end}")));
    }
    Ok(Self { start, end })
  }

  /// Creates a range covering a single year.
  pub const fn single(year: u32) -> Self {
    Self { start: year, end: year }
  }

  /// Parses `"YYYY"` or `"YYYY-YYYY"`.
  ///
  /// The ranged form must span at least two years: `"2022-2022"` is rejected
  /// because a single year is always written in the bare form.
  pub fn parse(text: &str) -> Result<Self, CopyrightError> {
    let caps = YEARS_REGEX
      .captures(text)
      .ok_or_else(|| CopyrightError::Parse(text.to_string()))?;

    let start = parse_year(&caps[1], text)?;
    match caps.get(2) {
      None => Ok(Self::single(start)),
      Some(end) => {
        let end = parse_year(end.as_str(), text)?;
        if start >= end {
          return Err(CopyrightError::IllegalYearRange(text.to_string()));
        }
        Ok(Self { start, end })
      }
    }
  }

  pub const fn start(&self) -> u32 {
    self.start
  }

  pub const fn end(&self) -> u32 {
    self.end
  }

  /// Whether `year` falls inside this range.
  pub const fn contains(&self, year: u32) -> bool {
    self.start <= year && year <= self.end
  }

  /// Moves the end of the range forward. Callers guarantee `end > self.end`.
  pub(crate) fn extend_to(&mut self, end: u32) {
    debug_assert!(end > self.end);
    self.end = end;
  }
}

fn parse_year(digits: &str, text: &str) -> Result<u32, CopyrightError> {
  digits.parse().ok().ok_or_else(|| CopyrightError::Parse(text.to_string()))
}

impl FromStr for YearRange {
  type Err = CopyrightError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

/// Years are written with four digits, the only width [`YearRange::parse`]
/// accepts.
impl fmt::Display for YearRange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.start == self.end {
      write!(f, "{:04}", self.start)
    } else {
      write!(f, "{:04}-{:04}", self.start, self.end)
    }
  }
}
