use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use playwatch_detect::{MonitorConfig, VariantDatabase};

use crate::error::PlaywatchError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    /// Per-player settings keyed by variant name.
    #[serde(default)]
    pub players: BTreeMap<String, MonitorConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub timeout_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

impl AppConfig {
    /// Load config: user file if it exists, built-in defaults otherwise.
    pub fn load() -> Result<Self, PlaywatchError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, PlaywatchError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, PlaywatchError> {
        toml::from_str(toml_str).map_err(|e| PlaywatchError::Config(e.to_string()))
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), PlaywatchError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PlaywatchError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| PlaywatchError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Settings for one player. Players without a section get the defaults.
    pub fn player(&self, name: &str) -> MonitorConfig {
        self.players.get(name).cloned().unwrap_or_default()
    }

    /// Transport timeout for one fetch, never below one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.general.timeout_secs.max(1))
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Path to the user variant overrides, next to the config file.
    pub fn variants_path() -> PathBuf {
        variants_path_beside(&Self::config_path())
    }

    fn config_dir() -> PathBuf {
        ProjectDirs::from("", "", "playwatch")
            .map(|d| d.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

/// `variants.toml` in the same directory as `config_path`.
pub fn variants_path_beside(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("variants.toml")
}

/// The embedded variant database with the user's overrides merged in.
pub fn load_variants() -> Result<VariantDatabase, PlaywatchError> {
    load_variants_from(&AppConfig::variants_path())
}

pub fn load_variants_from(path: &Path) -> Result<VariantDatabase, PlaywatchError> {
    let mut db = VariantDatabase::embedded();
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let user = VariantDatabase::from_toml(&content)
            .map_err(|e| PlaywatchError::Config(e.to_string()))?;
        db.merge_user(&user);
    }
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use playwatch_detect::AUTO_DETECT;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.general.timeout_secs, 5);
        assert_eq!(config.players.len(), 2);
        let hc = config.player("mpc-hc");
        assert_eq!(hc.ip, "localhost");
        assert_eq!(hc.port, AUTO_DETECT);
        assert_eq!(hc.poll_interval, 10.0);
    }

    #[test]
    fn test_missing_player_gets_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.general.timeout_secs, 5);
        assert_eq!(config.player("mpc-be"), MonitorConfig::default());
    }

    #[test]
    fn test_partial_player_section() {
        let config = AppConfig::from_toml(
            r#"
            [players.mpc-hc]
            port = "13579"
            poll_interval = 2.5
            "#,
        )
        .unwrap();
        let hc = config.player("mpc-hc");
        assert_eq!(hc.ip, "localhost");
        assert_eq!(hc.port, "13579");
        assert_eq!(hc.poll_interval, 2.5);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[general\n").unwrap_err();
        assert!(matches!(err, PlaywatchError::Config(_)));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.players.insert(
            "mpc-hc".into(),
            MonitorConfig {
                ip: "192.168.1.20".into(),
                port: "8080".into(),
                poll_interval: 3.0,
            },
        );
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.player("mpc-hc").ip, "192.168.1.20");
        assert_eq!(loaded.player("mpc-hc").port, "8080");
        assert_eq!(loaded.player("mpc-be").port, AUTO_DETECT);
    }

    #[test]
    fn test_user_variants_merged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("variants.toml");
        std::fs::write(
            &path,
            r#"
            [[variant]]
            name = "mpc-qt"
            url_template = "http://{ip}:{port}/variables.html"
            platforms = ["linux"]
            "#,
        )
        .unwrap();

        let db = load_variants_from(&path).unwrap();
        assert_eq!(db.variants.len(), 3);
        assert!(db.find("mpc-qt").is_some());
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let config = AppConfig::from_toml("[general]\ntimeout_secs = 0\n").unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(1));
        let config = AppConfig::from_toml("[general]\ntimeout_secs = 7\n").unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_variants_path_follows_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.toml");
        assert_eq!(
            variants_path_beside(&config_path),
            dir.path().join("variants.toml")
        );
        assert_eq!(
            variants_path_beside(Path::new("config.toml")),
            PathBuf::from("variants.toml")
        );
        assert_eq!(
            AppConfig::variants_path().parent(),
            AppConfig::config_path().parent()
        );
    }

    #[test]
    fn test_no_user_variants_is_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let db = load_variants_from(&dir.path().join("variants.toml")).unwrap();
        assert_eq!(db.variants.len(), 2);
    }
}
