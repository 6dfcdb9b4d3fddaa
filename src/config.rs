use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::output::{DEFAULT_CHUNK_SECONDS, TranscriptFormat};
use crate::youtube::{DEFAULT_ENDPOINT, DEFAULT_PLATFORM};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: Option<String>,
    pub platform: Option<String>,
    pub format: Option<TranscriptFormat>,
    pub chunk_seconds: Option<u64>,
    /// Request timeout; the HTTP client default applies when unset
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from ~/.config/ytscribe/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn platform(&self) -> &str {
        self.platform.as_deref().unwrap_or(DEFAULT_PLATFORM)
    }

    pub fn format(&self) -> TranscriptFormat {
        self.format.unwrap_or_default()
    }

    pub fn chunk_seconds(&self) -> u64 {
        self.chunk_seconds.unwrap_or(DEFAULT_CHUNK_SECONDS)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytscribe")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
endpoint = "http://localhost:8080/transcript"
platform = "yt"
format = "chunks"
chunk_seconds = 60
timeout_secs = 10
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoint(), "http://localhost:8080/transcript");
        assert_eq!(config.platform(), "yt");
        assert_eq!(config.format(), TranscriptFormat::Chunks);
        assert_eq!(config.chunk_seconds(), 60);
        assert_eq!(config.timeout_secs, Some(10));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.platform(), DEFAULT_PLATFORM);
        assert_eq!(config.format(), TranscriptFormat::Text);
        assert_eq!(config.chunk_seconds(), DEFAULT_CHUNK_SECONDS);
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(r#"format = "text""#).unwrap();
        assert_eq!(config.format(), TranscriptFormat::Text);
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(toml::from_str::<Config>(r#"format = "srt""#).is_err());
    }
}
