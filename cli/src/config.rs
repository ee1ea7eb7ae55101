//! Application configuration: JSON file, then environment overrides.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chainexec_core::ExecutorConfig;
use serde::{Deserialize, Serialize};

use crate::logging::LogConfig;

pub const ENV_STRICT_MODE: &str = "CHAINEXEC_STRICT_MODE";
pub const ENV_ALLOW_STALE: &str = "CHAINEXEC_ALLOW_STALE";
pub const ENV_CACHE_DIR: &str = "CHAINEXEC_CACHE_DIR";
pub const ENV_TIMEOUT_SECS: &str = "CHAINEXEC_TIMEOUT_SECS";
pub const ENV_LOG: &str = "CHAINEXEC_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub executor: ExecutorConfig,
    /// Directory for the file-backed cache store.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Actions answered with `blocked` instead of running.
    #[serde(default)]
    pub blocked_actions: Vec<String>,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("chainexec-cache")
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            executor: ExecutorConfig::default(),
            cache_dir: default_cache_dir(),
            request_timeout_secs: default_timeout_secs(),
            blocked_actions: Vec::new(),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `path` if given (defaults otherwise), then apply the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Apply `CHAINEXEC_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_STRICT_MODE) {
            self.executor.strict_mode = parse_bool(ENV_STRICT_MODE, &v)?;
        }
        if let Some(v) = lookup(ENV_ALLOW_STALE) {
            self.executor.allow_stale_fallback = parse_bool(ENV_ALLOW_STALE, &v)?;
        }
        if let Some(v) = lookup(ENV_CACHE_DIR).filter(|v| !v.trim().is_empty()) {
            self.cache_dir = PathBuf::from(v.trim());
        }
        if let Some(v) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds"))?;
        }
        if let Some(v) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.log.level = v.trim().to_string();
        }
        Ok(())
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("{name} must be a boolean (got {other:?})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert!(!config.executor.strict_mode);
        assert!(config.executor.allow_stale_fallback);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.blocked_actions.is_empty());
    }

    #[test]
    fn env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                (ENV_STRICT_MODE, "true"),
                (ENV_ALLOW_STALE, "0"),
                (ENV_CACHE_DIR, "/var/cache/chainexec"),
                (ENV_TIMEOUT_SECS, " 5 "),
                (ENV_LOG, "debug"),
            ]))
            .unwrap();
        assert!(config.executor.strict_mode);
        assert!(!config.executor.allow_stale_fallback);
        assert_eq!(config.cache_dir, PathBuf::from("/var/cache/chainexec"));
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn bad_env_values_are_errors() {
        let mut config = AppConfig::default();
        assert!(config.apply_env(env(&[(ENV_STRICT_MODE, "maybe")])).is_err());
        assert!(config.apply_env(env(&[(ENV_TIMEOUT_SECS, "soon")])).is_err());
    }

    #[test]
    fn file_then_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "executor": {{ "strictMode": true }}, "blockedActions": ["cachePut"], "log": {{ "json": true }} }}"#
        )
        .unwrap();

        let mut config = AppConfig::from_file(file.path()).unwrap();
        assert!(config.executor.strict_mode);
        assert!(config.executor.allow_stale_fallback);
        assert_eq!(config.blocked_actions, vec!["cachePut"]);
        assert!(config.log.json);
        assert_eq!(config.log.level, "warn");

        config.apply_env(env(&[(ENV_STRICT_MODE, "off")])).unwrap();
        assert!(!config.executor.strict_mode);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::from_file(&dir.path().join("absent.json")).is_err());
    }
}
