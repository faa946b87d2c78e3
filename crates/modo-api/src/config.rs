//! Backend configuration: whether the mock backend is enabled, whether
//! it seeds sample data, and where it persists snapshots.
//!
//! Precedence: the `MODO_MOCKS` environment variable overrides the file;
//! a missing file means defaults. The user-level file lives under the
//! platform config directory (`<config>/modo/config.toml`).

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Master switch for the simulated backend.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Populate the demo accounts and sample tree on startup.
    #[serde(default = "default_true")]
    pub seed: bool,
    /// Snapshot file for state persistence across runs; `None` disables
    /// persistence.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
    /// User id attributed to unauthenticated dev requests.
    #[serde(default = "default_fallback_user")]
    pub fallback_user: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            seed: default_true(),
            snapshot_path: None,
            fallback_user: default_fallback_user(),
        }
    }
}

/// Load a config file, or defaults when it does not exist.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<BackendConfig> {
    if !path.exists() {
        return Ok(BackendConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str::<BackendConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the user-level config from the platform config directory.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<BackendConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(BackendConfig::default());
    };
    load_config(&config_dir.join("modo/config.toml"))
}

/// File config with the `MODO_MOCKS` env override applied.
///
/// # Errors
///
/// Propagates file read/parse failures from [`load_config`].
pub fn resolve_config(path: &Path) -> Result<BackendConfig> {
    let mut config = load_config(path)?;
    if let Some(enabled) = env_enabled(env::var("MODO_MOCKS").ok().as_deref()) {
        config.enabled = enabled;
    }
    Ok(config)
}

fn env_enabled(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}

const fn default_true() -> bool {
    true
}

const fn default_fallback_user() -> u64 {
    1
}

#[cfg(test)]
mod tests {
    use super::{BackendConfig, env_enabled, load_config};
    use std::path::PathBuf;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(cfg, BackendConfig::default());
        assert!(cfg.enabled);
        assert!(cfg.seed);
        assert_eq!(cfg.fallback_user, 1);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "seed = false\nsnapshot_path = \"/tmp/modo-snapshot.json\"\n",
        )
        .expect("write");

        let cfg = load_config(&path).expect("load");
        assert!(cfg.enabled);
        assert!(!cfg.seed);
        assert_eq!(
            cfg.snapshot_path,
            Some(PathBuf::from("/tmp/modo-snapshot.json"))
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "seed = \"maybe\"").expect("write");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn env_values_are_normalized() {
        assert_eq!(env_enabled(Some("1")), Some(true));
        assert_eq!(env_enabled(Some("TRUE")), Some(true));
        assert_eq!(env_enabled(Some("off")), Some(false));
        assert_eq!(env_enabled(Some("0")), Some(false));
        assert_eq!(env_enabled(Some("maybe")), None);
        assert_eq!(env_enabled(None), None);
    }
}
