use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/recommend";
pub const DEFAULT_TOP_N: u32 = 5;

/// Which JSON shape the backend answers a successful request with
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    /// `{"message": "...", "data": [...]}`
    Envelope,
    /// A bare `[...]` of items, with "no matches" sent as a 404 `{"message": "..."}`
    #[default]
    Array,
}

/// How item lists are laid out in the transcript
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Cards,
    Table,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Cards => ViewMode::Table,
            ViewMode::Table => ViewMode::Cards,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Cards => "cards",
            ViewMode::Table => "table",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub top_n: u32,
    pub response_shape: ResponseShape,
    pub view_mode: ViewMode,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            top_n: DEFAULT_TOP_N,
            response_shape: ResponseShape::Array,
            view_mode: ViewMode::Cards,
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        tracing::debug!(path = %path.display(), endpoint = %config.endpoint, "loaded config");
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("smartpick").join("config.json"))
    }

    /// Directory for rolling log files
    pub fn log_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(data_dir.join("smartpick").join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::new());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.top_n, 5);
    }

    #[test]
    fn test_default_shape_matches_default_route() {
        // `/recommend` answers with a bare array; the envelope lives at `/api/recommend`
        let config = Config::new();
        assert!(config.endpoint.ends_with("/recommend"));
        assert!(!config.endpoint.contains("/api/"));
        assert_eq!(config.response_shape, ResponseShape::Array);
        assert_eq!(ResponseShape::default(), ResponseShape::Array);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            endpoint: "http://localhost:9000/api/recommend".to_string(),
            top_n: 3,
            response_shape: ResponseShape::Envelope,
            view_mode: ViewMode::Table,
        };
        config.save_to(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"response_shape\": \"envelope\""));
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"top_n": 10}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.view_mode, ViewMode::Cards);
    }

    #[test]
    fn test_view_mode_toggle() {
        assert_eq!(ViewMode::Cards.toggle(), ViewMode::Table);
        assert_eq!(ViewMode::Table.toggle(), ViewMode::Cards);
    }
}
