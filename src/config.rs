use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cache::TabKey;
use crate::livescore::{PlayerTab, TeamTab};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  #[serde(default)]
  pub player: PlayerConfig,
  #[serde(default)]
  pub team: TeamConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the livescore service (e.g. "https://scores.example.com")
  pub url: String,
  /// Per-request timeout
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
  15
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerConfig {
  /// Tab opened when none is given on the command line
  #[serde(default, deserialize_with = "deserialize_tab")]
  pub default_tab: Option<PlayerTab>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamConfig {
  #[serde(default, deserialize_with = "deserialize_tab")]
  pub default_tab: Option<TeamTab>,
}

fn deserialize_tab<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: serde::Deserializer<'de>,
  T: TabKey,
{
  let v: Option<String> = Option::deserialize(deserializer)?;
  v.map(|s| s.parse::<T>().map_err(serde::de::Error::custom))
    .transpose()
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./livescore-detail.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/livescore-detail/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/livescore-detail/config.yaml\n\
                 See config.example.yaml for the format."
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("livescore-detail.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("livescore-detail").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents).map_err(|e| eyre!("{}", e))?;
    Ok(config)
  }

  /// Get the livescore API key from environment variables.
  ///
  /// Checks LIVESCORE_API_KEY first, then FOOTBALL_API_KEY as fallback.
  /// The key is optional; requests go out unauthenticated without one.
  pub fn get_api_key() -> Option<String> {
    std::env::var("LIVESCORE_API_KEY")
      .or_else(|_| std::env::var("FOOTBALL_API_KEY"))
      .ok()
      .filter(|key| !key.trim().is_empty())
  }

  /// Directory the log file is written to.
  pub fn log_dir() -> Result<PathBuf> {
    dirs::data_dir()
      .map(|dir| dir.join("livescore-detail"))
      .ok_or_else(|| eyre!("Could not determine data directory"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_full_config() {
    let config = Config::parse(
      r#"
api:
  url: https://scores.example.com
  timeout_secs: 30
player:
  default_tab: Trophies
team:
  default_tab: squad
"#,
    )
    .unwrap();

    assert_eq!(config.api.url, "https://scores.example.com");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.player.default_tab, Some(PlayerTab::Trophies));
    assert_eq!(config.team.default_tab, Some(TeamTab::Squad));
  }

  #[test]
  fn test_defaults() {
    let config = Config::parse("api:\n  url: http://localhost:3000\n").unwrap();
    assert_eq!(config.api.timeout_secs, 15);
    assert!(config.player.default_tab.is_none());
    assert!(config.team.default_tab.is_none());
  }

  #[test]
  fn test_unknown_default_tab_is_rejected() {
    let err = Config::parse(
      r#"
api:
  url: http://localhost:3000
team:
  default_tab: history
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown team tab 'history'"));
  }

  #[test]
  fn test_missing_explicit_path() {
    let err = Config::load(Some(Path::new("/nonexistent/livescore-detail.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }
}
