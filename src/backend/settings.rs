use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::export::{CsvStyle, DEFAULT_FILE_NAME};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_output")]
    pub default_output: String,
    #[serde(default)]
    pub strict_csv: bool,
    #[serde(default = "default_show_summary")]
    pub show_summary: bool,
}

fn default_output() -> String {
    DEFAULT_FILE_NAME.to_string()
}

fn default_show_summary() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_output: default_output(),
            strict_csv: false,
            show_summary: true,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "fieldsplit").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Loads settings from `path`, falling back to defaults when it is missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Self::from_json(&content))
        {
            Ok(settings) => {
                tracing::debug!(path = ?path, "settings loaded");
                settings
            }
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "ignoring unreadable settings");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
        }
        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write settings: {:?}", path))?;
        tracing::debug!(path = ?path, "settings saved");
        Ok(())
    }

    pub fn reset_at(path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove settings: {:?}", path))?;
        }
        Ok(())
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse settings")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize settings")
    }

    pub fn csv_style(&self) -> CsvStyle {
        if self.strict_csv {
            CsvStyle::Strict
        } else {
            CsvStyle::Loose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_output, "parsed_data.csv");
        assert_eq!(settings.csv_style(), CsvStyle::Loose);
        assert!(settings.show_summary);
    }

    #[test]
    fn test_missing_fields_use_defaults() -> Result<()> {
        let settings = Settings::from_json(r#"{ "strict_csv": true }"#)?;
        assert_eq!(settings.default_output, "parsed_data.csv");
        assert_eq!(settings.csv_style(), CsvStyle::Strict);
        assert!(settings.show_summary);
        Ok(())
    }

    #[test]
    fn test_save_load_reset() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.json");

        let settings = Settings {
            default_output: "out.csv".to_string(),
            strict_csv: true,
            show_summary: false,
        };
        settings.save_to(&path)?;
        assert_eq!(Settings::load_from(&path), settings);

        Settings::reset_at(&path)?;
        assert!(!path.exists());
        assert_eq!(Settings::load_from(&path), Settings::default());
        Ok(())
    }

    #[test]
    fn test_corrupt_file_falls_back() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, "not json")?;

        assert_eq!(Settings::load_from(&path), Settings::default());
        Ok(())
    }
}
