//! # File Record Module
//!
//! A source file split into its copyright header and the rest of its content.
//!
//! The header is the leading run of `//` lines, one copyright notice per line:
//!
//! ```text
//! // Copyright 2022-2024 Forecasting Technologies LTD.
//! // Copyright 2021-2022 Zeitgeist PM LLC.
//! //
//! // This file is part of Zeitgeist.
//! ```
//!
//! The first line that holds only the marker (the `//` above) ends the header.
//! That line and everything after it form the body, which is written back
//! unmodified.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::trace;

use super::file_io::FileIO;
use crate::copyright::CopyrightNotice;
use crate::error::{CopyrightError, LicenseError};

/// Comment marker that starts every header line.
pub const COMMENT_MARKER: &str = "//";

/// A file's copyright notices in header order, plus its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
  path: PathBuf,
  notices: Vec<CopyrightNotice>,
  body: String,
}

impl FileRecord {
  /// Creates an empty record; call [`read`](Self::read) to load the file.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self::with_contents(path, Vec::new(), String::new())
  }

  /// Creates a record from notices and body already in memory.
  pub fn with_contents(path: impl Into<PathBuf>, notices: Vec<CopyrightNotice>, body: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      notices,
      body: body.into(),
    }
  }

  /// Splits `content` into header notices and body.
  pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, LicenseError> {
    let path = path.into();
    let mut notices = Vec::new();
    let mut header_len = 0;

    for (line_index, line) in content.split_inclusive('\n').enumerate() {
      let Some(rest) = line.strip_prefix(COMMENT_MARKER) else {
        break;
      };
      if rest.trim().is_empty() {
        break;
      }

      let raw_text = line.trim_end_matches(['\n', '\r']);
      let notice = raw_text[COMMENT_MARKER.len()..]
        .strip_prefix(' ')
        .ok_or_else(|| CopyrightError::Parse(raw_text.to_string()))
        .and_then(CopyrightNotice::parse)
        .map_err(|source| LicenseError::IllegalCopyright {
          path: path.clone(),
          line_index,
          raw_text: raw_text.to_string(),
          source,
        })?;

      trace!("{}: header line {}: {}", path.display(), line_index, notice);
      notices.push(notice);
      header_len += line.len();
    }

    Ok(Self {
      path,
      notices,
      body: content[header_len..].to_string(),
    })
  }

  /// Reads the file from disk, replacing the notices and body held so far.
  ///
  /// Nothing is kept if a header line is malformed.
  pub fn read(&mut self) -> Result<(), LicenseError> {
    let content = FileIO::read_full_content(&self.path).map_err(|source| LicenseError::Io {
      path: self.path.clone(),
      source,
    })?;
    let parsed = Self::parse(self.path.clone(), &content)?;
    self.notices = parsed.notices;
    self.body = parsed.body;
    Ok(())
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn notices(&self) -> &[CopyrightNotice] {
    &self.notices
  }

  pub fn body(&self) -> &str {
    &self.body
  }

  /// Checks that `owner` holds exactly one notice and that it covers `year`.
  pub fn check(&self, owner: &str, year: u32) -> Result<(), LicenseError> {
    if self.notices.is_empty() {
      return Err(LicenseError::MissingCopyright {
        path: self.path.clone(),
        owner: None,
      });
    }
    self.ensure_unique_owners()?;

    let notice = self.owner_notice(owner).ok_or_else(|| LicenseError::MissingCopyright {
      path: self.path.clone(),
      owner: Some(owner.to_string()),
    })?;

    if notice.latest_year() < year {
      return Err(LicenseError::OutdatedCopyright {
        path: self.path.clone(),
        notice: notice.clone(),
        current_year: year,
      });
    }
    Ok(())
  }

  /// Makes `owner`'s notice cover `year` and returns whether anything changed.
  ///
  /// A missing notice is created at the top of the header, unless `owner`
  /// cannot be written into one ([`LicenseError::InvalidOwner`]). A notice
  /// that already lists years after `year` is reported as
  /// [`LicenseError::FutureCopyright`] and left alone.
  pub fn update_license(&mut self, owner: &str, year: u32) -> Result<bool, LicenseError> {
    self.ensure_unique_owners()?;

    let Some(index) = self.notices.iter().position(|notice| notice.owner() == owner) else {
      let notice = CopyrightNotice::for_year(owner, year).map_err(|source| LicenseError::InvalidOwner {
        path: self.path.clone(),
        source,
      })?;
      self.notices.insert(0, notice);
      return Ok(true);
    };

    let notice = &mut self.notices[index];
    let latest = notice.latest_year();
    if latest == year {
      return Ok(false);
    }
    if latest > year {
      return Err(LicenseError::FutureCopyright {
        path: self.path.clone(),
        notice: notice.clone(),
        current_year: year,
      });
    }

    let raw_text = notice.to_string();
    notice.extend(year).map_err(|source| LicenseError::IllegalCopyright {
      path: self.path.clone(),
      line_index: index,
      raw_text,
      source,
    })?;
    Ok(true)
  }

  /// The file content for the current notices and body.
  pub fn render(&self) -> String {
    let mut content = String::with_capacity(self.body.len() + self.notices.len() * 64);
    for notice in &self.notices {
      content.push_str(COMMENT_MARKER);
      content.push(' ');
      content.push_str(&notice.to_string());
      content.push('\n');
    }
    content.push_str(&self.body);
    content
  }

  /// Writes [`render`](Self::render) back to the file.
  pub fn write(&self) -> Result<(), LicenseError> {
    FileIO::write_file(&self.path, &self.render()).map_err(|source| LicenseError::Io {
      path: self.path.clone(),
      source,
    })
  }

  fn owner_notice(&self, owner: &str) -> Option<&CopyrightNotice> {
    self.notices.iter().find(|notice| notice.owner() == owner)
  }

  fn ensure_unique_owners(&self) -> Result<(), LicenseError> {
    let mut seen = HashSet::with_capacity(self.notices.len());
    for notice in &self.notices {
      if !seen.insert(notice.owner()) {
        return Err(LicenseError::DuplicateCopyright {
          path: self.path.clone(),
          owner: notice.owner().to_string(),
        });
      }
    }
    Ok(())
  }
}
