use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_API_URL: &str = "USER_ADMIN_API_URL";
pub const ENV_PAGE_SIZE: &str = "USER_ADMIN_PAGE_SIZE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the collection server; `/users` is appended
    pub api_base_url: String,
    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Event poll timeout, which is also how often finished requests are applied
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_page_size() -> usize {
    10
}

fn default_tick_rate_ms() -> u64 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3001".to_string(),
            page_size: default_page_size(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".user-admin-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load the user config, writing defaults on first run, then apply
    /// environment overrides
    pub fn load() -> anyhow::Result<Config> {
        let config = match Self::config_path() {
            Some(path) => match Self::load_from(&path)? {
                Some(config) => config,
                None => {
                    let config = Config::default();
                    if let Err(e) = config.save_to(&path) {
                        tracing::warn!(path = %path.display(), error = %e, "could not write default config");
                    }
                    config
                }
            },
            None => Config::default(),
        };
        Ok(config.with_overrides(|key| env::var(key).ok()))
    }

    /// Read a config file; `Ok(None)` when it does not exist
    pub fn load_from(path: &Path) -> anyhow::Result<Option<Config>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(Some(config))
    }

    /// Save the config to `path`, creating its directory
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply `USER_ADMIN_*` overrides from `lookup`
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Config {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(size) = lookup(ENV_PAGE_SIZE) {
            match size.trim().parse() {
                Ok(size) => self.page_size = size,
                Err(_) => tracing::warn!(value = %size, "ignoring invalid {}", ENV_PAGE_SIZE),
            }
        }
        self
    }

    pub fn page_size(&self) -> anyhow::Result<NonZeroUsize> {
        NonZeroUsize::new(self.page_size).ok_or_else(|| anyhow!("page_size must be greater than 0"))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_base_url: "http://10.0.0.5:3001".to_string(),
            page_size: 25,
            tick_rate_ms: 50,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Some(config));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_base_url":"http://example.test"}"#).unwrap();

        let config = Config::load_from(&path).unwrap().unwrap();
        assert_eq!(config.api_base_url, "http://example.test");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.tick_rate(), Duration::from_millis(100));
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_overrides(|key| match key {
            ENV_API_URL => Some("http://remote:4000".to_string()),
            ENV_PAGE_SIZE => Some("50".to_string()),
            _ => None,
        });
        assert_eq!(config.api_base_url, "http://remote:4000");
        assert_eq!(config.page_size().unwrap().get(), 50);

        let unchanged = Config::default().with_overrides(|key| match key {
            ENV_PAGE_SIZE => Some("many".to_string()),
            _ => None,
        });
        assert_eq!(unchanged.page_size, 10);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        assert!(config.page_size().is_err());
    }
}
