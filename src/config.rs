use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the save file location.
pub const SAVE_FILE_ENV: &str = "BROCK_SAVE_FILE";
/// Environment variable overriding the config file location.
pub const CONFIG_FILE_ENV: &str = "BROCK_CONFIG";

/// Settings read from `config.json`. Every field is optional.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where tasks are saved.
    pub save_file: Option<PathBuf>,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: Option<String>,
}

impl Config {
    /// Loads the config file, or defaults when there is none.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.log_level()?;
        Ok(config)
    }

    /// The configured log level, `info` when unset.
    pub fn log_level(&self) -> Result<LevelFilter> {
        match &self.log_level {
            Some(level) => level
                .parse()
                .with_context(|| format!("Invalid log_level '{}'", level)),
            None => Ok(LevelFilter::Info),
        }
    }
}

/// Returns the path to the config file.
///
/// 1. `BROCK_CONFIG` environment variable.
/// 2. `~/.config/brock/config.json` (on Linux).
fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|p| p.join("brock").join("config.json"))
}

/// Returns the path to the save file.
///
/// The path is determined in the following order:
/// 1. `--file` on the command line.
/// 2. `BROCK_SAVE_FILE` environment variable.
/// 3. `save_file` in the config file.
/// 4. `~/.local/share/brock/tasks.txt` (on Linux).
/// 5. `./tasks.txt` (fallback).
pub fn resolve_save_path(cli_file: Option<PathBuf>, config: &Config) -> PathBuf {
    pick_save_path(
        cli_file,
        std::env::var(SAVE_FILE_ENV).ok(),
        config,
        dirs::data_local_dir(),
    )
}

fn pick_save_path(
    cli_file: Option<PathBuf>,
    env_file: Option<String>,
    config: &Config,
    data_dir: Option<PathBuf>,
) -> PathBuf {
    cli_file
        .or_else(|| env_file.filter(|s| !s.is_empty()).map(PathBuf::from))
        .or_else(|| config.save_file.clone())
        .unwrap_or_else(|| match data_dir {
            Some(dir) => dir.join("brock").join("tasks.txt"),
            None => PathBuf::from("tasks.txt"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_path_precedence() {
        let config = Config {
            save_file: Some(PathBuf::from("/cfg/tasks.txt")),
            log_level: None,
        };
        let data = Some(PathBuf::from("/data"));

        assert_eq!(
            pick_save_path(Some("/cli.txt".into()), Some("/env.txt".into()), &config, data.clone()),
            PathBuf::from("/cli.txt")
        );
        assert_eq!(
            pick_save_path(None, Some("/env.txt".into()), &config, data.clone()),
            PathBuf::from("/env.txt")
        );
        assert_eq!(
            pick_save_path(None, Some(String::new()), &config, data.clone()),
            PathBuf::from("/cfg/tasks.txt")
        );
        assert_eq!(
            pick_save_path(None, None, &Config::default(), data),
            PathBuf::from("/data/brock/tasks.txt")
        );
        assert_eq!(
            pick_save_path(None, None, &Config::default(), None),
            PathBuf::from("tasks.txt")
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "save_file": "/tmp/x.txt", "log_level": "debug" }"#).unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.save_file, Some(PathBuf::from("/tmp/x.txt")));
        assert_eq!(config.log_level().unwrap(), LevelFilter::Debug);
    }

    #[test]
    fn test_partial_and_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        fs::write(&path, "{}").unwrap();
        assert_eq!(Config::load_from_file(&path).unwrap(), Config::default());

        fs::write(&path, r#"{ "log_level": "loud" }"#).unwrap();
        assert!(Config::load_from_file(&path).is_err());

        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from_file(&path).is_err());
    }
}
