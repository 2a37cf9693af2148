use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::sqlite::DEFAULT_TABLE;
use crate::error::{FuelError, Result};

pub const REST_KEY_ENV: &str = "FUELOG_REST_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Sqlite,
    Rest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default)]
    pub rest_url: Option<String>,
    #[serde(default)]
    pub rest_key: Option<String>,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            backend: BackendKind::Sqlite,
            table: default_table(),
            rest_url: None,
            rest_key: None,
        }
    }
}

impl Settings {
    pub fn data_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir_path().join("fuelog.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir_path().join("fuelog.log")
    }

    /// The API key, with the environment taking precedence over the file.
    pub fn rest_key(&self) -> Option<String> {
        std::env::var(REST_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.rest_key.clone().filter(|k| !k.is_empty()))
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("fuelog")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local")
        .join("share")
        .join("fuelog")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&settings_path(), settings)
}

/// Missing or unreadable files give the defaults.
fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| FuelError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::path::absolute(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/test".to_string(),
            backend: BackendKind::Rest,
            table: "fuel".to_string(),
            rest_url: Some("https://abc.supabase.co".to_string()),
            rest_key: Some("anon".to_string()),
        };
        save_settings_to(&path, &settings).unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.data_dir, "/tmp/test");
        assert_eq!(loaded.backend, BackendKind::Rest);
        assert_eq!(loaded.table, "fuel");
        assert_eq!(loaded.rest_url.as_deref(), Some("https://abc.supabase.co"));
        assert_eq!(loaded.rest_key.as_deref(), Some("anon"));
    }

    #[test]
    fn test_load_missing_or_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(load_settings_from(&path).backend, BackendKind::Sqlite);

        std::fs::write(&path, "{ not json").unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.backend, BackendKind::Sqlite);
        assert_eq!(loaded.table, "cargas");
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/test"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.backend, BackendKind::Sqlite);
        assert_eq!(s.table, "cargas");
        assert!(s.rest_url.is_none());
        assert!(s.db_path().ends_with("fuelog.db"));
    }

    #[test]
    fn test_backend_kind_is_lowercase_in_json() {
        let s = Settings {
            backend: BackendKind::Rest,
            ..Settings::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains(r#""backend":"rest""#));
    }
}
