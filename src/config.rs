//! Run configuration, loaded from an optional TOML file.
//!
//! ```toml
//! [fetch]
//! endpoint = "https://earthquake.usgs.gov/fdsnws/event/1/query"
//! start_time = "2025-03-28"
//! page_limit = 20000
//! timeout_secs = 120
//!
//! [output]
//! dir = "out"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::models::collection::DEFAULT_TITLE;

pub const DEFAULT_ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";
pub const DEFAULT_START_TIME: &str = "2025-03-28";
pub const DEFAULT_PAGE_LIMIT: usize = 20_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_USER_AGENT: &str = "quakefence/0.1";

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    pub endpoint: String,
    pub start_time: String,
    pub page_limit: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            start_time: DEFAULT_START_TIME.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub title: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.page_limit == 0 {
            return Err(ConfigError::Invalid {
                key: "fetch.page_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "fetch.timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fetch.page_limit, 20_000);
        assert_eq!(config.fetch.timeout_secs, 120);
        assert_eq!(config.fetch.start_time, "2025-03-28");
        assert_eq!(config.output.dir, PathBuf::from("."));
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml(
            r#"
            [fetch]
            page_limit = 500
            start_time = "2024-01-01"

            [output]
            dir = "results"
            "#,
        )
        .unwrap();
        assert_eq!(config.fetch.page_limit, 500);
        assert_eq!(config.fetch.start_time, "2024-01-01");
        assert_eq!(config.fetch.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.output.dir, PathBuf::from("results"));
        assert_eq!(config.output.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_zero_page_limit_rejected() {
        let err = Config::from_toml("[fetch]\npage_limit = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "fetch.page_limit",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_toml_rejected() {
        assert!(matches!(
            Config::from_toml("[fetch\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quakefence.toml");
        std::fs::write(&path, "[fetch]\ntimeout_secs = 30\n").unwrap();
        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.fetch.timeout_secs, 30);

        let missing = Config::load_from_file(dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
