// Startup configuration.
// Loads .env and the process environment; a missing API key is fatal.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;

use crate::cache::DEFAULT_TTL;
use crate::error::ConfigError;
use crate::groq::client::{DEFAULT_MODEL, GROQ_API_BASE};

pub const API_KEY_VAR: &str = "GROQ_API_KEY";
pub const MODEL_VAR: &str = "GROQ_MODEL";
pub const BASE_URL_VAR: &str = "GROQ_BASE_URL";
pub const CACHE_TTL_VAR: &str = "EXAM_COACH_CACHE_TTL_SECS";

const ENV_FILE: &str = ".env";

/// Resolved application configuration.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub cache_ttl: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl Config {
    /// Load `.env` (if one is found) and read configuration from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().ok();
        let config_dir = config_dir();
        if let Some(path) = find_env_file(cwd.as_deref(), config_dir.as_deref()) {
            dotenvy::from_path(&path)?;
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from a variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let model = lookup(MODEL_VAR)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = lookup(BASE_URL_VAR)
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| GROQ_API_BASE.to_string());

        let cache_ttl = match lookup(CACHE_TTL_VAR) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue {
                    name: CACHE_TTL_VAR,
                    value,
                })?,
            None => DEFAULT_TTL,
        };

        Ok(Self {
            api_key,
            model,
            base_url,
            cache_ttl,
        })
    }
}

/// Locate the `.env` file: working directory first, then the platform config dir.
pub fn find_env_file(cwd: Option<&Path>, config_dir: Option<&Path>) -> Option<PathBuf> {
    [cwd, config_dir]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(ENV_FILE))
        .find(|path| path.is_file())
}

/// Platform config directory (~/.config/exam-coach on Linux).
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "exam-coach").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Platform cache directory, home of the trace log file.
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "exam-coach").map(|dirs| dirs.cache_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use tempfile::TempDir;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "gsk_test")])).unwrap();

        assert_eq!(config.api_key, "gsk_test");
        assert_eq!(config.model, "llama3-8b-8192");
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_missing_api_key() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_empty_api_key() {
        let result = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "  ")]));
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "gsk_test"),
            (MODEL_VAR, "llama-3.1-8b-instant"),
            (BASE_URL_VAR, "http://localhost:8080/v1"),
            (CACHE_TTL_VAR, "60"),
        ]))
        .unwrap();

        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_ttl() {
        let result = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "gsk_test"),
            (CACHE_TTL_VAR, "an hour"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                name: CACHE_TTL_VAR,
                ..
            })
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "gsk_secret")])).unwrap();
        assert!(!format!("{:?}", config).contains("gsk_secret"));
    }

    #[test]
    fn test_find_env_file_prefers_cwd() {
        let cwd = TempDir::new().unwrap();
        let config = TempDir::new().unwrap();
        std::fs::write(cwd.path().join(".env"), "GROQ_API_KEY=a\n").unwrap();
        std::fs::write(config.path().join(".env"), "GROQ_API_KEY=b\n").unwrap();

        let found = find_env_file(Some(cwd.path()), Some(config.path()));
        assert_eq!(found, Some(cwd.path().join(".env")));
    }

    #[test]
    fn test_find_env_file_falls_back_to_config_dir() {
        let cwd = TempDir::new().unwrap();
        let config = TempDir::new().unwrap();
        std::fs::write(config.path().join(".env"), "GROQ_API_KEY=b\n").unwrap();

        let found = find_env_file(Some(cwd.path()), Some(config.path()));
        assert_eq!(found, Some(config.path().join(".env")));
    }

    #[test]
    fn test_find_env_file_none() {
        let cwd = TempDir::new().unwrap();
        assert_eq!(find_env_file(Some(cwd.path()), None), None);
    }
}
