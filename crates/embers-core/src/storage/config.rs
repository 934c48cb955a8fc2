//! TOML-based application configuration.
//!
//! Stores:
//! - Ledger file name
//! - Habit definitions file name
//! - Export title and default file name
//!
//! Configuration is stored as `config.toml` inside the data directory the
//! caller passes in.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::stats::DEFAULT_EXPORT_TITLE;

const CONFIG_FILE: &str = "config.toml";

/// Ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_ledger_file")]
    pub file_name: String,
}

/// Habit definitions configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionsConfig {
    #[serde(default = "default_definitions_file")]
    pub file_name: String,
}

/// CSV export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_title")]
    pub title: String,
    #[serde(default = "default_export_file")]
    pub file_name: String,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub definitions: DefinitionsConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

// Default functions
fn default_ledger_file() -> String {
    "habit-day-log.json".into()
}
fn default_definitions_file() -> String {
    "habits.toml".into()
}
fn default_export_title() -> String {
    DEFAULT_EXPORT_TITLE.into()
}
fn default_export_file() -> String {
    "embers-habits-export.csv".into()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            file_name: default_ledger_file(),
        }
    }
}

impl Default for DefinitionsConfig {
    fn default() -> Self {
        Self {
            file_name: default_definitions_file(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: default_export_title(),
            file_name: default_export_file(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    invalid(format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("only leaf values can be set".into()));
                    }
                    _ => {
                        if value.trim().is_empty() {
                            return Err(invalid("value must not be empty".into()));
                        }
                        serde_json::Value::String(value.into())
                    }
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Ledger document location inside `data_dir`.
    pub fn ledger_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.ledger.file_name)
    }

    /// Definitions file location inside `data_dir`.
    pub fn definitions_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.definitions.file_name)
    }

    /// Load from `data_dir`, writing defaults when no config exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path(data_dir);
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save(data_dir)?;
                Ok(cfg)
            }
            Err(err) => Err(ConfigError::LoadFailed {
                path,
                message: err.to_string(),
            }),
        }
    }

    /// Persist to `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self, data_dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path(data_dir);
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.clone(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, data_dir: &Path, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save(data_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.ledger.file_name, "habit-day-log.json");
        assert_eq!(parsed.export.title, DEFAULT_EXPORT_TITLE);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("definitions.file_name").as_deref(), Some("habits.toml"));
        assert_eq!(cfg.get("export.title").as_deref(), Some("Embers Habit Export"));
        assert!(cfg.get("export.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_string() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "export.title", "My Habits").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "export.title").unwrap(),
            &serde_json::Value::String("My Habits".to_string())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "ledger.nonexistent_key", "value");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_json_value_by_path_rejects_sections() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "export", "x");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn load_writes_defaults_then_set_persists() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::load(dir.path()).unwrap();
        assert!(Config::path(dir.path()).exists());

        cfg.set(dir.path(), "ledger.file_name", "other.json").unwrap();
        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.ledger.file_name, "other.json");
        assert_eq!(reloaded.ledger_path(dir.path()), dir.path().join("other.json"));
    }

    #[test]
    fn unparseable_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(Config::path(dir.path()), "ledger = [").unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
