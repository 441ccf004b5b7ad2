//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/boook/config.toml)
//! 3. Environment variables (BOOOK_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "BOOOK";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for durable storage slots
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// TMDB API key for the movie browser (optional)
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// Result-count cap for book metadata search
    #[serde(default = "default_max_search_results")]
    pub max_search_results: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            tmdb_api_key: None,
            max_search_results: default_max_search_results(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (BOOOK_DATA_DIR, BOOOK_TMDB_API_KEY, BOOOK_MAX_SEARCH_RESULTS)
    /// 2. Config file (~/.config/boook/config.toml or BOOOK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // BOOOK_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // BOOOK_TMDB_API_KEY
        if let Ok(val) = std::env::var(format!("{}_TMDB_API_KEY", ENV_PREFIX)) {
            self.tmdb_api_key = if val.is_empty() { None } else { Some(val) };
        }

        // BOOOK_MAX_SEARCH_RESULTS
        if let Ok(val) = std::env::var(format!("{}_MAX_SEARCH_RESULTS", ENV_PREFIX)) {
            if let Ok(n) = val.parse() {
                self.max_search_results = n;
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with BOOOK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("boook")
            .join("config.toml")
    }

    /// Get the file path backing a storage slot
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("boook")
}

fn default_max_search_results() -> u32 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap();
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            // Clear all the vars
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "BOOOK_DATA_DIR",
        "BOOOK_TMDB_API_KEY",
        "BOOOK_MAX_SEARCH_RESULTS",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.tmdb_api_key.is_none());
        assert_eq!(config.max_search_results, 20);
        assert!(config.data_dir.ends_with("boook"));
    }

    #[test]
    fn test_slot_path() {
        let config = Config {
            data_dir: PathBuf::from("/data/boook"),
            ..Config::default()
        };

        assert_eq!(
            config.slot_path("boook_books"),
            PathBuf::from("/data/boook/boook_books.json")
        );
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("BOOOK_DATA_DIR", "/tmp/boook-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/boook-test"));
    }

    #[test]
    fn test_env_override_tmdb_api_key() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        assert!(config.tmdb_api_key.is_none());

        env::set_var("BOOOK_TMDB_API_KEY", "abc123");
        config.apply_env_overrides();
        assert_eq!(config.tmdb_api_key, Some("abc123".to_string()));

        // Empty string clears it
        env::set_var("BOOOK_TMDB_API_KEY", "");
        config.apply_env_overrides();
        assert!(config.tmdb_api_key.is_none());
    }

    #[test]
    fn test_env_override_max_search_results() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("BOOOK_MAX_SEARCH_RESULTS", "5");
        config.apply_env_overrides();
        assert_eq!(config.max_search_results, 5);

        // Unparsable values are ignored
        env::set_var("BOOOK_MAX_SEARCH_RESULTS", "lots");
        config.apply_env_overrides();
        assert_eq!(config.max_search_results, 5);
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/boook"),
            tmdb_api_key: Some("key".to_string()),
            max_search_results: 10,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("tmdb_api_key"));
        assert!(toml_str.contains("max_search_results"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.tmdb_api_key, config.tmdb_api_key);
        assert_eq!(parsed.max_search_results, config.max_search_results);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            tmdb_api_key = "secret"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.tmdb_api_key, Some("secret".to_string()));
        assert_eq!(config.max_search_results, 20);
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("BOOOK_DATA_DIR", temp_dir.path().join("data"));

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        // Should return defaults when file doesn't exist
        assert!(config.tmdb_api_key.is_none());
        assert_eq!(config.max_search_results, 20);
    }
}
