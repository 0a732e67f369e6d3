use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

use crate::generator::http::normalize_base_url;
use crate::tone::Tone;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/email";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const API_URL_ENV: &str = "MAILREPLY_API_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub api_url: Option<String>,
    pub default_tone: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    pub fn save_default_tone(tone: Tone) -> Result<()> {
        let mut config = Self::load().unwrap_or_else(|_| Self::new());
        config.default_tone = Some(tone.display_name().to_string());
        config.save()
    }

    /// Pick the generation endpoint: explicit override, then the
    /// `MAILREPLY_API_URL` environment variable, then the file, then the default.
    pub fn resolve_api_url(&self, cli_override: Option<&str>) -> Result<String> {
        let env_url = std::env::var(API_URL_ENV).ok();
        self.resolve_api_url_with(cli_override, env_url.as_deref())
    }

    pub fn resolve_api_url_with(
        &self,
        cli_override: Option<&str>,
        env_url: Option<&str>,
    ) -> Result<String> {
        let raw = cli_override
            .or(env_url.filter(|url| !url.trim().is_empty()))
            .or(self.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL);
        normalize_base_url(raw)
    }

    pub fn tone(&self) -> Tone {
        self.default_tone
            .as_deref()
            .and_then(Tone::from_str)
            .unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("mailreply").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();

        assert_eq!(config, Config::new());
        assert_eq!(config.tone(), Tone::None);
        assert_eq!(config.request_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(
            config.resolve_api_url_with(None, None).unwrap(),
            DEFAULT_API_URL
        );
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_url: Some("https://replies.example.com/api/email/".to_string()),
            default_tone: Some("Friendly".to_string()),
            request_timeout_secs: Some(15),
        };

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.tone(), Tone::Friendly);
        assert_eq!(loaded.request_timeout(), Duration::from_secs(15));
        assert_eq!(
            loaded.resolve_api_url_with(None, None).unwrap(),
            "https://replies.example.com/api/email"
        );
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_api_url_precedence() {
        let config = Config {
            api_url: Some("http://from-file:8080".to_string()),
            ..Config::new()
        };

        assert_eq!(
            config
                .resolve_api_url_with(Some("http://from-cli:1"), Some("http://from-env:2"))
                .unwrap(),
            "http://from-cli:1"
        );
        assert_eq!(
            config.resolve_api_url_with(None, Some("http://from-env:2")).unwrap(),
            "http://from-env:2"
        );
        assert_eq!(
            config.resolve_api_url_with(None, Some("  ")).unwrap(),
            "http://from-file:8080"
        );
        assert!(config.resolve_api_url_with(Some("nope"), None).is_err());
    }

    #[test]
    fn test_unknown_tone_falls_back_to_none() {
        let config = Config {
            default_tone: Some("sarcastic".to_string()),
            ..Config::new()
        };
        assert_eq!(config.tone(), Tone::None);
    }
}
