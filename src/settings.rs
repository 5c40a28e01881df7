use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::chart::{DEFAULT_FLOOR, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{Result, TallyError};
use crate::reports::DEFAULT_BAR_WIDTH;

/// The CSV export currently being explored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    /// Also the key the source's groupings are stored under.
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default)]
    pub source: Option<DataSource>,
    #[serde(default = "default_chart_width")]
    pub chart_width: f64,
    #[serde(default = "default_chart_height")]
    pub chart_height: f64,
    #[serde(default = "default_chart_floor")]
    pub chart_floor: f64,
    /// Leading groupings left out of the stacked chart.
    #[serde(default = "default_chart_skip_groups")]
    pub chart_skip_groups: usize,
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
}

fn default_chart_width() -> f64 {
    DEFAULT_WIDTH
}

fn default_chart_height() -> f64 {
    DEFAULT_HEIGHT
}

fn default_chart_floor() -> f64 {
    DEFAULT_FLOOR
}

fn default_chart_skip_groups() -> usize {
    1
}

fn default_bar_width() -> f64 {
    DEFAULT_BAR_WIDTH
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            source: None,
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
            chart_floor: default_chart_floor(),
            chart_skip_groups: default_chart_skip_groups(),
            bar_width: default_bar_width(),
        }
    }
}

impl Settings {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn require_source(&self) -> Result<&DataSource> {
        self.source.as_ref().ok_or(TallyError::NoSource)
    }
}

fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("TALLY_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tally")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("TALLY_CONFIG_DIR") {
        return PathBuf::from(dir).join("data");
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tally")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "ignoring unreadable settings: {e}");
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| TallyError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_json() {
        let settings = Settings {
            data_dir: "/tmp/test".to_string(),
            source: Some(DataSource {
                name: "swedbank-bjorn".to_string(),
                path: "/tmp/swedbank-bjorn.csv".to_string(),
                format: None,
            }),
            chart_floor: -5000.0,
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        assert!(!json.contains("format"));
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.data_dir, "/tmp/test");
        assert_eq!(loaded.source, settings.source);
        assert_eq!(loaded.chart_floor, -5000.0);
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.source.is_none());
        assert_eq!(s.chart_width, 500.0);
        assert_eq!(s.chart_height, 300.0);
        assert_eq!(s.chart_skip_groups, 1);
        assert!(!s.data_dir.is_empty());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/test"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.chart_floor, -100000.0);
        assert_eq!(s.bar_width, 300.0);
        assert!(matches!(s.require_source(), Err(TallyError::NoSource)));
    }
}
