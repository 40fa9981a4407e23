//! Settings resolution: built-in defaults, an optional TOML file, then
//! `GROC_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::Deserialize;

const DEFAULT_DATABASE: &str = "~/.groc/groc.db";
const DEFAULT_CONFIG: &str = "~/.groc/config.toml";

/// Runtime settings, deserialised from the layered configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database file. A leading `~` is expanded.
  pub database_path: PathBuf,
}

impl Settings {
  /// Load settings, reading `config_file` if given or the default config
  /// file if it exists.
  pub fn load(config_file: Option<&Path>) -> Result<Self> {
    let config_file = config_file.map_or_else(
      || expand_tilde(Path::new(DEFAULT_CONFIG)),
      Path::to_path_buf,
    );

    let settings: Self = config::Config::builder()
      .set_default("database_path", DEFAULT_DATABASE)?
      .add_source(config::File::from(config_file).required(false))
      .add_source(config::Environment::with_prefix("GROC"))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise settings")?;

    Ok(settings.expanded())
  }

  /// Replace the database path, e.g. from a command-line flag.
  pub fn with_database(mut self, path: Option<PathBuf>) -> Self {
    if let Some(path) = path {
      self.database_path = path;
    }
    self.expanded()
  }

  fn expanded(mut self) -> Self {
    self.database_path = expand_tilde(&self.database_path);
    self
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if s == "~"
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home);
  }
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
