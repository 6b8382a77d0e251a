//! Server configuration
//!
//! Loaded from a TOML file, with the base URL optionally supplied on the
//! command line instead. Credentials never live in the file: the config
//! names an environment variable and the bootstrap reads it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use catalog_dispatch::FlushPolicy;

use crate::error::{Error, Result};

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_capacity() -> usize {
    1024
}

fn default_token_env() -> String {
    "CATALOG_TOKEN".to_string()
}

/// Deployment configuration for the catalog MCP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Catalog API root, e.g. `https://host/api/catalog`
    pub base_url: String,

    /// Environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Batch flush timing: absent = next tick, 0 = immediate,
    /// n = hold the queue open for n milliseconds
    #[serde(default)]
    pub batch_flush_delay_ms: Option<u64>,

    /// Tool names excluded from registration
    #[serde(default)]
    pub disabled_tools: Vec<String>,

    /// Where `--export-manifest` writes when no path is given on the CLI
    #[serde(default)]
    pub manifest_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&raw)?;
        config.check()?;
        Ok(config)
    }

    /// Minimal configuration from a base URL alone.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token_env: default_token_env(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
            batch_flush_delay_ms: None,
            disabled_tools: Vec::new(),
            manifest_path: None,
        }
    }

    fn check(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config("base_url must be set".to_string()));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn flush_policy(&self) -> FlushPolicy {
        match self.batch_flush_delay_ms {
            None => FlushPolicy::NextTick,
            Some(0) => FlushPolicy::Immediate,
            Some(ms) => FlushPolicy::Delay(Duration::from_millis(ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minimal_toml() {
        let config: ServerConfig =
            toml::from_str(r#"base_url = "https://catalog.example.com/api/catalog""#).unwrap();
        assert_eq!(config.token_env, "CATALOG_TOKEN");
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.cache_capacity, 1024);
        assert_eq!(config.flush_policy(), FlushPolicy::NextTick);
        assert!(config.disabled_tools.is_empty());
    }

    #[test]
    fn test_full_toml() {
        let config: ServerConfig = toml::from_str(
            r#"
            base_url = "https://catalog.example.com/api/catalog"
            token_env = "MY_TOKEN"
            cache_ttl_secs = 60
            cache_capacity = 16
            batch_flush_delay_ms = 25
            disabled_tools = ["remove_entity_by_uid"]
            manifest_path = "/tmp/manifest.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.token_env, "MY_TOKEN");
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(
            config.flush_policy(),
            FlushPolicy::Delay(Duration::from_millis(25))
        );
        assert_eq!(config.disabled_tools, vec!["remove_entity_by_uid"]);
    }

    #[test]
    fn test_zero_delay_means_immediate() {
        let mut config = ServerConfig::with_base_url("https://x");
        config.batch_flush_delay_ms = Some(0);
        assert_eq!(config.flush_policy(), FlushPolicy::Immediate);
    }

    #[test]
    fn test_load_rejects_empty_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, r#"base_url = "  ""#).unwrap();
        assert!(ServerConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            base_url = "https://catalog.example.com/api/catalog"
            cache_ttl_secs = 120
            "#,
        )
        .unwrap();
        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.cache_ttl_secs, 120);
    }
}
