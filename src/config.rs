//! Dashboard configuration file support.
//!
//! Every section is optional; missing keys fall back to their defaults.
//!
//! ```toml
//! [data]
//! csv_path = "social_media_engagement.csv"
//!
//! [output]
//! format = "json"
//! currency = "$ "
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Where the engagement CSV lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
    /// Prefix for money amounts in text output
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("social_media_engagement.csv")
}

fn default_currency() -> String {
    "₹ ".to_string()
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            currency: default_currency(),
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.output.currency, "₹ ");
    }

    #[test]
    fn test_partial_sections() {
        let config = DashboardConfig::from_toml(
            r#"
            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.currency, "₹ ");
        assert_eq!(config.data.csv_path, PathBuf::from("social_media_engagement.csv"));
    }

    #[test]
    fn test_from_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "[data]\ncsv_path = \"/tmp/posts.csv\"\n").unwrap();
        let config = DashboardConfig::from_file(tmp.path()).unwrap();
        assert_eq!(config.data.csv_path, PathBuf::from("/tmp/posts.csv"));
    }

    #[test]
    fn test_bad_format_is_rejected() {
        let err = DashboardConfig::from_toml("[output]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = DashboardConfig::from_file(Path::new("/nonexistent/dashboard.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
