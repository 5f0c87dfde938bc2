//! # Copyright Module
//!
//! A single copyright notice such as `Copyright 2020-2021, 2023 Holder.`: an
//! owner plus the years the owner holds the copyright for.
//!
//! The year ranges of a notice are always kept sorted and disjoint, so
//! the last range ends with the most recent year covered by the notice.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CopyrightError;
use crate::years::YearRange;

static NOTICE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^Copyright ([0-9]{4}(?:-[0-9]{4})?(?:, [0-9]{4}(?:-[0-9]{4})?)*) (.+)\.$")
    .expect("notice regex must compile")
});

/// Separator between the year ranges of a notice.
const YEARS_SEPARATOR: &str = ", ";

/// One owner's copyright notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyrightNotice {
  owner: String,
  ranges: Vec<YearRange>,
}

impl CopyrightNotice {
  /// Creates a notice from already parsed ranges.
  ///
  /// # Errors
  ///
  /// Returns [`CopyrightError::IllegalYearRange`] if `ranges` is empty or not
  /// strictly increasing and disjoint, and [`CopyrightError::IllegalOwner`] if
  /// the owner fails [`validate_owner`].
  pub fn new(owner: impl Into<String>, ranges: Vec<YearRange>) -> Result<Self, CopyrightError> {
    let owner = owner.into();
    validate_owner(&owner)?;
    validate_ranges(&ranges)?;
    Ok(Self { owner, ranges })
  }

  /// Creates a notice covering exactly one year.
  pub fn for_year(owner: impl Into<String>, year: u32) -> Result<Self, CopyrightError> {
    Self::new(owner, vec![YearRange::single(year)])
  }

  /// Parses a notice line without its comment marker.
  pub fn parse(line: &str) -> Result<Self, CopyrightError> {
    let caps = NOTICE_REGEX
      .captures(line)
      .ok_or_else(|| CopyrightError::Parse(line.to_string()))?;

    let ranges = caps[1]
      .split(YEARS_SEPARATOR)
      .map(YearRange::parse)
      .collect::<Result<Vec<_>, _>>()?;

    Self::new(&caps[2], ranges)
  }

  pub fn owner(&self) -> &str {
    &self.owner
  }

  pub fn ranges(&self) -> &[YearRange] {
    &self.ranges
  }

  /// The most recent year covered by this notice.
  pub fn latest_year(&self) -> u32 {
    self.ranges.last().map_or(0, YearRange::end)
  }

  /// Adds `year` to the notice.
  ///
  /// A year directly following the latest one is merged into the last range;
  /// a later year opens a new range.
  ///
  /// # Errors
  ///
  /// Returns [`CopyrightError::IllegalYearRange`] if `year` is not strictly
  /// after [`latest_year`](Self::latest_year). The notice is unchanged then.
  pub fn extend(&mut self, year: u32) -> Result<(), CopyrightError> {
    let latest = self.latest_year();
    if year <= latest {
      return Err(CopyrightError::IllegalYearRange(format!(
        "cannot extend '{self}' with {year}"
      )));
    }

    match self.ranges.last_mut() {
      Some(last) if year == latest + 1 => last.extend_to(year),
      _ => self.ranges.push(YearRange::single(year)),
    }
    Ok(())
  }
}

/// Checks that `owner` renders into a notice line that parses back.
pub fn validate_owner(owner: &str) -> Result<(), CopyrightError> {
  if owner.trim().is_empty() {
    return Err(CopyrightError::IllegalOwner("owner cannot be empty".to_string()));
  }
  if owner.contains(['\n', '\r']) {
    return Err(CopyrightError::IllegalOwner(format!(
      "'{}' spans several lines",
      owner.escape_debug()
    )));
  }
  Ok(())
}

fn validate_ranges(ranges: &[YearRange]) -> Result<(), CopyrightError> {
  if ranges.is_empty() {
    return Err(CopyrightError::IllegalYearRange("no years given".to_string()));
  }

  for pair in ranges.windows(2) {
    if pair[1].start() <= pair[0].end() {
      return Err(CopyrightError::IllegalYearRange(format!(
        "{} does not follow {}",
        pair[1], pair[0]
      )));
    }
  }
  Ok(())
}

impl FromStr for CopyrightNotice {
  type Err = CopyrightError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl fmt::Display for CopyrightNotice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Copyright ")?;
    for (i, range) in self.ranges.iter().enumerate() {
      if i > 0 {
        f.write_str(YEARS_SEPARATOR)?;
      }
      write!(f, "{range}")?;
    }
    write!(f, " {}.", self.owner)
  }
}
