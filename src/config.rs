//! # Configuration Module
//!
//! Settings read from `.check-license.toml`:
//!
//! ```toml
//! owner = "Forecasting Technologies LTD"
//! base-branch = "main"
//!
//! [extensions]
//! include = ["rs"]
//! exclude = []
//! ```
//!
//! Every key is optional. Command-line flags take precedence over the file.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::verbose_log;

pub const DEFAULT_CONFIG_FILENAME: &str = ".check-license.toml";

/// Points at a config file to use instead of the workspace one.
pub const CONFIG_ENV_VAR: &str = "CHECK_LICENSE_CONFIG";

/// Owner whose notices are kept current unless configured otherwise.
pub const DEFAULT_OWNER: &str = "Forecasting Technologies LTD";

/// Branch that other branches are compared against.
pub const DEFAULT_BASE_BRANCH: &str = "main";

/// The `[extensions]` table.
///
/// `include` absent means every extension not in `exclude`; `include` present
/// means only those extensions. Entries are written without the leading dot.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ExtensionConfig {
  pub include: Option<Vec<String>>,
  pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  /// Designated owner whose notice must cover the current year.
  pub owner: String,

  /// Branch to diff against in branch mode.
  pub base_branch: String,

  pub extensions: ExtensionConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      owner: DEFAULT_OWNER.to_string(),
      base_branch: DEFAULT_BASE_BRANCH.to_string(),
      extensions: ExtensionConfig {
        include: Some(vec!["rs".to_string()]),
        exclude: Vec::new(),
      },
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("cannot read {}: {source}", .path.display())]
  ReadError { path: PathBuf, source: std::io::Error },

  #[error("invalid TOML in {}: {source}", .path.display())]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A key is present but its value is unusable.
  #[error("invalid value for '{field}': {message}")]
  InvalidValue { field: &'static str, message: String },
}

impl ConfigError {
  fn invalid(field: &'static str, message: impl Into<String>) -> Self {
    Self::InvalidValue {
      field,
      message: message.into(),
    }
  }
}

impl Config {
  /// Reads and validates the config file at `path`.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
      path: path.to_path_buf(),
      source,
    })?;
    let config: Self = toml::from_str(&text).map_err(|source| ConfigError::ParseError {
      path: path.to_path_buf(),
      source,
    })?;
    config.validate()?;

    verbose_log!(
      "Config {}: owner '{}', base branch '{}'",
      path.display(),
      config.owner,
      config.base_branch
    );
    Ok(config)
  }

  /// Rejects values that would make every notice unparseable or every branch
  /// lookup fail.
  pub fn validate(&self) -> Result<(), ConfigError> {
    validate_owner(&self.owner)?;

    if self.base_branch.trim().is_empty() {
      return Err(ConfigError::invalid("base-branch", "base branch cannot be empty"));
    }

    let mut listed = self.extensions.include.iter().flatten().chain(&self.extensions.exclude);
    if let Some(ext) = listed.find(|ext| ext.starts_with('.')) {
      return Err(ConfigError::invalid(
        "extensions",
        format!("write '{}' without the leading dot", ext.trim_start_matches('.')),
      ));
    }

    Ok(())
  }
}

/// Checks that `owner` can appear in a notice and be parsed back.
pub fn validate_owner(owner: &str) -> Result<(), ConfigError> {
  let problem = if owner.trim().is_empty() {
    "owner cannot be empty"
  } else if owner.trim() != owner {
    "owner cannot start or end with whitespace"
  } else if owner.contains(['\n', '\r']) {
    "owner must fit on one line"
  } else {
    return Ok(());
  };
  Err(ConfigError::invalid("owner", problem))
}

/// Where a config file was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
  /// `--config FILE`
  Flag(PathBuf),
  /// The [`CONFIG_ENV_VAR`] environment variable.
  Env(PathBuf),
  /// [`DEFAULT_CONFIG_FILENAME`] in the workspace root.
  Workspace(PathBuf),
}

impl ConfigSource {
  pub fn path(&self) -> &Path {
    match self {
      Self::Flag(path) | Self::Env(path) | Self::Workspace(path) => path,
    }
  }
}

impl fmt::Display for ConfigSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Flag(path) => write!(f, "{} (--config)", path.display()),
      Self::Env(path) => write!(f, "{} (${CONFIG_ENV_VAR})", path.display()),
      Self::Workspace(path) => write!(f, "{}", path.display()),
    }
  }
}

/// Finds the config file to use, trying `--config`, then
/// [`CONFIG_ENV_VAR`], then the workspace root.
///
/// An environment variable naming a missing file is skipped; a `--config`
/// path is returned as is, whether or not it exists.
pub fn discover_config(explicit_path: Option<&Path>, workspace_root: &Path) -> Option<ConfigSource> {
  if let Some(path) = explicit_path {
    return Some(ConfigSource::Flag(path.to_path_buf()));
  }

  if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from) {
    if path.is_file() {
      return Some(ConfigSource::Env(path));
    }
    verbose_log!("Ignoring {}: {} does not exist", CONFIG_ENV_VAR, path.display());
  }

  let candidate = workspace_root.join(DEFAULT_CONFIG_FILENAME);
  candidate.is_file().then_some(ConfigSource::Workspace(candidate))
}

/// Loads the discovered config file, or the defaults when there is none or
/// `no_config` is set.
pub fn load_config(explicit_path: Option<&Path>, workspace_root: &Path, no_config: bool) -> Result<Config> {
  if no_config {
    verbose_log!("Not loading a config file (--no-config)");
    return Ok(Config::default());
  }

  let Some(source) = discover_config(explicit_path, workspace_root) else {
    verbose_log!("No config file, using defaults");
    return Ok(Config::default());
  };
  verbose_log!("Using config {}", source);
  Config::load(source.path()).with_context(|| format!("Failed to load config from {source}"))
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_parse_full_config() {
    let config: Config = toml::from_str(
      "owner = \"Zeitgeist PM LLC\"\nbase-branch = \"develop\"\n\n[extensions]\ninclude = [\"rs\", \"ts\"]\n",
    )
    .expect("config should parse");

    assert_eq!(config.owner, "Zeitgeist PM LLC");
    assert_eq!(config.base_branch, "develop");
    assert_eq!(config.extensions.include, Some(vec!["rs".to_string(), "ts".to_string()]));
    assert!(config.extensions.exclude.is_empty());
  }

  #[test]
  fn test_missing_keys_fall_back_to_defaults() {
    let config: Config = toml::from_str("").expect("empty config should parse");
    assert_eq!(config, Config::default());
    assert_eq!(config.owner, DEFAULT_OWNER);
    assert_eq!(config.base_branch, DEFAULT_BASE_BRANCH);

    // An explicit table replaces the default include list.
    let config: Config = toml::from_str("[extensions]\nexclude = [\"md\"]\n").expect("config should parse");
    assert_eq!(config.extensions.include, None);
  }

  #[test]
  fn test_unknown_keys_are_rejected() {
    assert!(toml::from_str::<Config>("owners = \"x\"\n").is_err());
    assert!(toml::from_str::<Config>("[extensions]\nonly = [\"rs\"]\n").is_err());
  }

  #[test]
  fn test_validate_owner() {
    assert!(validate_owner("Forecasting Technologies LTD").is_ok());
    assert!(validate_owner("ACME Inc.").is_ok());
    for owner in ["", "   ", " Padded", "Two\nLines"] {
      assert!(
        matches!(validate_owner(owner), Err(ConfigError::InvalidValue { field: "owner", .. })),
        "owner {owner:?} should be rejected"
      );
    }
  }

  #[test]
  fn test_validate_rejects_bad_values() {
    let empty_base = Config {
      base_branch: " ".to_string(),
      ..Config::default()
    };
    assert!(matches!(
      empty_base.validate(),
      Err(ConfigError::InvalidValue { field: "base-branch", .. })
    ));

    let dotted = Config {
      extensions: ExtensionConfig {
        include: None,
        exclude: vec![".md".to_string()],
      },
      ..Config::default()
    };
    let err = dotted.validate().expect_err("leading dot should be rejected");
    assert_eq!(
      err.to_string(),
      "invalid value for 'extensions': write 'md' without the leading dot"
    );
  }

  #[test]
  fn test_load_reports_read_and_parse_errors() {
    let dir = tempdir().expect("create temp dir");
    let missing = dir.path().join(DEFAULT_CONFIG_FILENAME);
    assert!(matches!(Config::load(&missing), Err(ConfigError::ReadError { .. })));

    fs::write(&missing, "owner = \n").expect("write config");
    assert!(matches!(Config::load(&missing), Err(ConfigError::ParseError { .. })));
  }

  #[test]
  fn test_load_config_sources() {
    let dir = tempdir().expect("create temp dir");
    let workspace_file = dir.path().join(DEFAULT_CONFIG_FILENAME);
    let custom_file = dir.path().join("custom.toml");
    fs::write(&workspace_file, "owner = \"Workspace Owner\"\n").expect("write config");
    fs::write(&custom_file, "owner = \"Custom Owner\"\n").expect("write config");

    assert_eq!(
      discover_config(None, dir.path()),
      Some(ConfigSource::Workspace(workspace_file))
    );
    assert_eq!(
      load_config(None, dir.path(), false).expect("workspace config").owner,
      "Workspace Owner"
    );
    assert_eq!(
      load_config(Some(&custom_file), dir.path(), false).expect("custom config").owner,
      "Custom Owner"
    );
    assert_eq!(
      load_config(Some(&custom_file), dir.path(), true).expect("defaults").owner,
      DEFAULT_OWNER
    );
  }

  #[test]
  fn test_load_config_without_file() {
    let dir = tempdir().expect("create temp dir");
    assert_eq!(load_config(None, dir.path(), false).expect("defaults"), Config::default());

    let missing = dir.path().join("missing.toml");
    assert!(load_config(Some(&missing), dir.path(), false).is_err());
  }
}
