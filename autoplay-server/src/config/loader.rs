//! Configuration loader

use std::path::Path;

use autoplay_utils::{config_file, AutoplayError, Result};

use super::AppConfig;
use crate::adb::commands;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from default location
    pub fn load() -> Result<AppConfig> {
        let path = config_file();
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            Ok(AppConfig::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| AutoplayError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content, path)
    }

    /// Parse configuration from string
    pub fn parse(content: &str, path: &Path) -> Result<AppConfig> {
        toml::from_str(content).map_err(|e| AutoplayError::ConfigInvalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Validate configuration
    pub fn validate(config: &AppConfig) -> Result<()> {
        let polling = &config.polling;
        if !(1..=60).contains(&polling.interval_secs) {
            return Err(AutoplayError::config(
                "interval_secs must be between 1 and 60",
            ));
        }
        if polling.settle_secs > 60 {
            return Err(AutoplayError::config("settle_secs must be at most 60"));
        }
        if let autoplay_protocol::ResumeAction::KeyEvent(key) = &polling.resume_action {
            if !commands::is_valid_key(key) {
                return Err(AutoplayError::config(format!(
                    "resume_action key '{}' is not a key code",
                    key
                )));
            }
        }

        if config.device.port == 0 {
            return Err(AutoplayError::config("device port must be non-zero"));
        }
        if config.device.adb_path.trim().is_empty() {
            return Err(AutoplayError::config("adb_path must not be empty"));
        }

        if !commands::is_valid_key(&config.api.suspend_key) {
            return Err(AutoplayError::config(format!(
                "suspend_key '{}' is not a key code",
                config.api.suspend_key
            )));
        }
        if config.api.socket_addr().is_none() {
            return Err(AutoplayError::config(format!(
                "listen_addr '{}' is not a socket address",
                config.api.listen_addr
            )));
        }

        Ok(())
    }

    /// Load from `path` when given, else from the default location
    ///
    /// An explicit path must exist; the default location may be absent.
    pub fn load_from(path: Option<&Path>) -> Result<AppConfig> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    use crate::config::DEFAULT_CONFIG_TOML;

    #[test]
    fn test_load_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(
            &path,
            r#"
            [device]
            address = "192.168.1.20"

            [polling]
            interval_secs = 5
            "#,
        )
        .unwrap();

        let config = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(config.device.address.as_deref(), Some("192.168.1.20"));
        assert_eq!(config.polling.interval_secs, 5);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = ConfigLoader::load_from(Some(&path)).unwrap_err();
        assert!(matches!(err, AutoplayError::FileRead { .. }));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = ConfigLoader::parse("invalid { toml", Path::new("test.toml")).unwrap_err();
        assert!(matches!(err, AutoplayError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_embedded_defaults_parse_and_validate() {
        let config = ConfigLoader::parse(DEFAULT_CONFIG_TOML, Path::new("defaults.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        ConfigLoader::validate(&config).unwrap();
    }

    #[test]
    fn test_validate_interval_bounds() {
        let mut config = AppConfig::default();
        config.polling.interval_secs = 0;
        assert!(ConfigLoader::validate(&config).is_err());

        config.polling.interval_secs = 61;
        assert!(ConfigLoader::validate(&config).is_err());

        config.polling.interval_secs = 60;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_settle_allows_zero() {
        let mut config = AppConfig::default();
        config.polling.settle_secs = 0;
        assert!(ConfigLoader::validate(&config).is_ok());

        config.polling.settle_secs = 61;
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn test_validate_keys() {
        let mut config = AppConfig::default();
        config.api.suspend_key = "85; reboot".to_string();
        assert!(ConfigLoader::validate(&config).is_err());

        let mut config = AppConfig::default();
        config.polling.resume_action =
            autoplay_protocol::ResumeAction::KeyEvent("KEYCODE_MEDIA_PLAY".to_string());
        assert!(ConfigLoader::validate(&config).is_ok());

        config.polling.resume_action =
            autoplay_protocol::ResumeAction::KeyEvent("play".to_string());
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn test_validate_port_and_listen_addr() {
        let mut config = AppConfig::default();
        config.device.port = 0;
        assert!(ConfigLoader::validate(&config).is_err());

        let mut config = AppConfig::default();
        config.api.listen_addr = "localhost".to_string();
        assert!(ConfigLoader::validate(&config).is_err());
    }
}
