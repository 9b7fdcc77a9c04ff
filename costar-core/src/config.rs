use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Client configuration file
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the path-finding server (no trailing slash needed)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Wait budget for a shortest-path request
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout_secs: u64,

    /// Transport timeout for each actor search request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Where the TUI writes its log
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}
fn default_submit_timeout() -> u64 {
    15
}
fn default_request_timeout() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            submit_timeout_secs: default_submit_timeout(),
            request_timeout_secs: default_request_timeout(),
            log_file: None,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("base_url must start with http:// or https://, got '{0}'")]
    InvalidBaseUrl(String),
    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
}

/// Where a configuration came from
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigOrigin {
    /// File that was read; `None` means defaults
    pub path: Option<PathBuf>,
    /// `COSTAR_CONFIG` value that named a missing file
    pub missing_env: Option<PathBuf>,
}

impl ConfigOrigin {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            missing_env: None,
        }
    }

    pub fn log(&self) {
        if let Some(path) = &self.missing_env {
            tracing::warn!(path = %path.display(), "{} points at a missing file", CONFIG_ENV);
        }
        match &self.path {
            Some(path) => tracing::info!(path = %path.display(), "loaded config"),
            None => tracing::debug!("no config file found, using defaults"),
        }
    }
}

pub const CONFIG_NAMES: [&str; 4] = ["costar.yaml", "costar.yml", ".costar.yaml", ".costar.yml"];
pub const CONFIG_ENV: &str = "COSTAR_CONFIG";

impl ClientConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a string (useful for testing)
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Find a config file, or fall back to defaults when there is none.
    ///
    /// Order: `COSTAR_CONFIG`, then the standard names in `start_dir` and
    /// each of its parents. Nothing is logged here; call
    /// [`ConfigOrigin::log`] once a subscriber is installed.
    pub fn discover(start_dir: &Path) -> Result<(ConfigOrigin, Self), ConfigError> {
        Self::discover_from(std::env::var_os(CONFIG_ENV).map(PathBuf::from), start_dir)
    }

    fn discover_from(
        env_path: Option<PathBuf>,
        start_dir: &Path,
    ) -> Result<(ConfigOrigin, Self), ConfigError> {
        let mut origin = ConfigOrigin::default();
        if let Some(path) = env_path {
            if path.exists() {
                let config = Self::load(&path)?;
                origin.path = Some(path);
                return Ok((origin, config));
            }
            origin.missing_env = Some(path);
        }

        let mut dir = Some(start_dir);
        while let Some(current) = dir {
            for name in &CONFIG_NAMES {
                let path = current.join(name);
                if path.exists() {
                    let config = Self::load(&path)?;
                    origin.path = Some(path);
                    return Ok((origin, config));
                }
            }
            dir = current.parent();
        }

        Ok((origin, Self::default()))
    }

    /// Replace the base URL (command-line override) and re-validate
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        self.base_url = base_url.into();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.submit_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout {
                field: "submit_timeout_secs",
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout {
                field: "request_timeout_secs",
            });
        }
        Ok(())
    }

    /// Endpoint URL under the base, tolerating a trailing slash on the base
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_config() {
        let yaml = r#"
base_url: "https://movies.example.com/"
submit_timeout_secs: 30
log_file: /tmp/costar.log
"#;
        let config = ClientConfig::from_str(yaml).unwrap();
        assert_eq!(config.submit_timeout(), Duration::from_secs(30));
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/costar.log")));
        assert_eq!(
            config.endpoint("/shortest_path"),
            "https://movies.example.com/shortest_path"
        );
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ClientConfig::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.submit_timeout(), Duration::from_secs(15));
        assert_eq!(config.endpoint("actor_prefix"), "http://localhost:8000/actor_prefix");
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = ClientConfig::from_str("base_url: localhost:8000").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));

        let err = ClientConfig::from_str("submit_timeout_secs: 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ZeroTimeout {
                field: "submit_timeout_secs"
            }
        ));

        let err = ClientConfig::from_str("base_path: /api").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_discover_skips_missing_env_file() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join("costar.yaml"), "submit_timeout_secs: 20\n").unwrap();

        let missing = root.path().join("nope.yaml");
        let (origin, config) =
            ClientConfig::discover_from(Some(missing.clone()), &nested).unwrap();
        assert_eq!(origin.missing_env, Some(missing));
        assert_eq!(origin.path, Some(root.path().join("costar.yaml")));
        assert_eq!(config.submit_timeout_secs, 20);
    }

    #[test]
    fn test_discover_prefers_env_file() {
        let root = tempfile::tempdir().unwrap();
        let env_file = root.path().join("custom.yaml");
        std::fs::write(&env_file, "request_timeout_secs: 3\n").unwrap();

        let (origin, config) =
            ClientConfig::discover_from(Some(env_file.clone()), root.path()).unwrap();
        assert_eq!(origin, ConfigOrigin::file(&env_file));
        assert_eq!(config.request_timeout_secs, 3);
    }

    #[test]
    fn test_base_url_override() {
        let config = ClientConfig::default()
            .with_base_url("http://10.0.0.2:9000")
            .unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:9000");
        assert!(ClientConfig::default().with_base_url("ftp://x").is_err());
    }
}
