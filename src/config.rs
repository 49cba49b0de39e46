use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Environment variable that overrides `api.key`.
pub const API_KEY_ENV: &str = "NASA_API_KEY";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub export: ExportConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub key: String,             // NASA API credential
    pub base_url: String,        // Origin for both endpoints
    pub probe_media_url: bool,   // Check the picture URL is reachable after fetching
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: String, // Where spreadsheet exports are written
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: "DEMO_KEY".to_string(),
            base_url: "https://api.nasa.gov".to_string(),
            probe_media_url: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: "exports".to_string(),
        }
    }
}

impl Config {
    /// Loads config.toml from the working directory and applies `NASA_API_KEY`.
    pub fn load() -> Self {
        Self::load_from("config.toml").with_api_key(std::env::var(API_KEY_ENV).ok())
    }

    /// Reads the config at `path`.
    /// If it doesn't exist, writes a default one there.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if let Ok(content) = fs::read_to_string(path) {
            match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => {
                    warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    return Config::default();
                }
            }
        }

        let default_config = Config::default();

        // Save default config to disk for the user to edit later
        match toml::to_string_pretty(&default_config) {
            Ok(toml_string) => {
                if fs::write(path, toml_string).is_err() {
                    warn!("Could not write default {} to disk.", path.display());
                }
            }
            Err(e) => warn!("Could not serialize default config: {}", e),
        }

        info!("Loaded default configuration.");
        default_config
    }

    /// Replaces the API key when `key` is set and non-empty.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api.key = key.trim().to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(&path);
        assert_eq!(config, Config::default());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("DEMO_KEY"));
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nkey = \"abc123\"\n").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.api.key, "abc123");
        assert_eq!(config.api.base_url, "https://api.nasa.gov");
        assert_eq!(config.export.directory, "exports");
    }

    #[test]
    fn unparsable_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api = [[[").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn env_key_overrides_only_when_present() {
        let config = Config::default().with_api_key(Some("  secret ".to_string()));
        assert_eq!(config.api.key, "secret");

        let config = config.with_api_key(Some(String::new()));
        assert_eq!(config.api.key, "secret");
        assert_eq!(Config::default().with_api_key(None).api.key, "DEMO_KEY");
    }
}
