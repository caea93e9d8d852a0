//! Named configuration tables loaded from TOML.
//!
//! Each table is registered under an id (see [`assets::configs`]) and holds
//! sections of key/value pairs:
//!
//! ```toml
//! [player]
//! movementSpeed = 350.0
//! paddleRGB = [200, 200, 200]
//! ```
//!
//! Tables are kept as `serde_json` values so lookups can deserialize into any
//! `serde` type. Loading is idempotent: a second load of the same id is a
//! no-op that logs a warning. Lookups never fail; a missing key is `None`
//! and a value of the wrong type is logged and treated as missing, so
//! callers substitute their documented default.
//!
//! [`assets::configs`]: crate::assets::configs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::components::Color;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while loading a configuration table.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config '{id}' from {path}: {source}")]
    Io {
        id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML.
    #[error("failed to parse config '{id}': {source}")]
    Parse {
        id: String,
        #[source]
        source: toml::de::Error,
    },
}

type Table = Map<String, Value>;

// ---------------------------------------------------------------------------
// ConfigManager
// ---------------------------------------------------------------------------

/// Store of configuration tables keyed by id.
#[derive(Debug, Default)]
pub struct ConfigManager {
    /// Directory `<id>.toml` files are read from by [`ensure_loaded`](Self::ensure_loaded).
    /// `None` keeps the manager purely in-memory.
    root: Option<PathBuf>,
    tables: HashMap<String, Table>,
}

impl ConfigManager {
    /// An empty, in-memory manager. Tables must be added with
    /// [`load_config`](Self::load_config) or [`load_config_str`](Self::load_config_str).
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager that lazily reads `<root>/<id>.toml`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            tables: HashMap::new(),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        self.tables.contains_key(id)
    }

    /// Load the table `id` from a TOML file.
    pub fn load_config(&mut self, id: &str, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if self.is_loaded(id) {
            tracing::warn!(id, "config already loaded");
            return Ok(());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            id: id.to_owned(),
            path: path.to_owned(),
            source,
        })?;
        self.load_config_str(id, &text)?;
        tracing::info!(id, path = %path.display(), "config loaded");
        Ok(())
    }

    /// Load the table `id` from TOML text.
    pub fn load_config_str(&mut self, id: &str, text: &str) -> Result<(), ConfigError> {
        if self.is_loaded(id) {
            tracing::warn!(id, "config already loaded");
            return Ok(());
        }
        let table = match toml::from_str::<Value>(text) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Table::new(),
            Err(source) => {
                return Err(ConfigError::Parse {
                    id: id.to_owned(),
                    source,
                })
            }
        };
        self.tables.insert(id.to_owned(), table);
        Ok(())
    }

    /// Make sure `id` is loaded, reading `<root>/<id>.toml` if needed.
    ///
    /// Failures are logged, not returned: the caller falls back to defaults.
    /// Returns whether the table is available afterwards.
    pub fn ensure_loaded(&mut self, id: &str) -> bool {
        if self.is_loaded(id) {
            return true;
        }
        let Some(root) = &self.root else {
            return false;
        };
        let path = root.join(format!("{id}.toml"));
        match self.load_config(id, &path) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(id, error = %e, "config unavailable, using defaults");
                false
            }
        }
    }

    fn raw(&self, id: &str, section: &str, key: &str) -> Option<&Value> {
        self.tables.get(id)?.get(section)?.as_object()?.get(key)
    }

    /// Whether `section` exists in table `id`.
    pub fn has_section(&self, id: &str, section: &str) -> bool {
        self.tables
            .get(id)
            .and_then(|t| t.get(section))
            .is_some_and(Value::is_object)
    }

    /// Typed lookup of `[section] key` in table `id`.
    ///
    /// Integers deserialize into float targets; whole floats (`5.0`) are
    /// accepted for integer targets.
    pub fn get_value<T: DeserializeOwned>(&self, id: &str, section: &str, key: &str) -> Option<T> {
        let value = self.raw(id, section, key)?;
        match serde_json::from_value::<T>(value.clone()) {
            Ok(v) => Some(v),
            Err(err) => {
                if let Some(whole) = value.as_f64().filter(|f| f.fract() == 0.0) {
                    if let Ok(v) = serde_json::from_value::<T>(Value::from(whole as i64)) {
                        return Some(v);
                    }
                }
                tracing::warn!(id, section, key, error = %err, "malformed config value");
                None
            }
        }
    }

    /// Like [`get_value`](Self::get_value), substituting `default` when the
    /// value is missing or malformed.
    pub fn value_or<T: DeserializeOwned>(&self, id: &str, section: &str, key: &str, default: T) -> T {
        self.get_value(id, section, key).unwrap_or(default)
    }

    /// An array of strings; empty when missing or malformed.
    pub fn get_string_array(&self, id: &str, section: &str, key: &str) -> Vec<String> {
        self.get_value::<Vec<String>>(id, section, key)
            .unwrap_or_default()
    }

    /// A colour stored as `[r, g, b]`. Defaults to white.
    pub fn get_color(&self, id: &str, section: &str, key: &str) -> Color {
        match self.get_value::<[u8; 3]>(id, section, key) {
            Some([r, g, b]) => Color::rgb(r, g, b),
            None => {
                tracing::debug!(id, section, key, "colour missing, using white");
                Color::WHITE
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: &str = r#"
[player]
movementSpeed = 400
paddleWidth = 160.5
lives = 3.0
paddleRGB = [10, 20, 30]
name = "paddle"
"#;

    fn manager() -> ConfigManager {
        let mut config = ConfigManager::new();
        config.load_config_str("Player", PLAYER).unwrap();
        config
    }

    #[test]
    fn typed_lookups() {
        let config = manager();
        assert_eq!(config.get_value::<f32>("Player", "player", "movementSpeed"), Some(400.0));
        assert_eq!(config.get_value::<f32>("Player", "player", "paddleWidth"), Some(160.5));
        assert_eq!(config.get_value::<u32>("Player", "player", "lives"), Some(3));
        assert_eq!(config.get_value::<String>("Player", "player", "name").as_deref(), Some("paddle"));
    }

    #[test]
    fn missing_and_malformed_values_are_none() {
        let config = manager();
        assert_eq!(config.get_value::<f32>("Player", "player", "absent"), None);
        assert_eq!(config.get_value::<f32>("Player", "nosection", "movementSpeed"), None);
        assert_eq!(config.get_value::<f32>("Nope", "player", "movementSpeed"), None);
        assert_eq!(config.get_value::<f32>("Player", "player", "name"), None);
        assert_eq!(config.value_or("Player", "player", "absent", 7.5f32), 7.5);
    }

    #[test]
    fn colours_default_to_white() {
        let config = manager();
        assert_eq!(config.get_color("Player", "player", "paddleRGB"), Color::rgb(10, 20, 30));
        assert_eq!(config.get_color("Player", "player", "ballRGB"), Color::WHITE);
        assert_eq!(config.get_color("Player", "player", "name"), Color::WHITE);
    }

    #[test]
    fn second_load_is_a_no_op() {
        let mut config = manager();
        config
            .load_config_str("Player", "[player]\nmovementSpeed = 1\n")
            .unwrap();
        assert_eq!(config.get_value::<f32>("Player", "player", "movementSpeed"), Some(400.0));
    }

    #[test]
    fn parse_errors_are_reported() {
        let mut config = ConfigManager::new();
        let err = config.load_config_str("Bad", "[player\nx = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(!config.is_loaded("Bad"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut config = ConfigManager::new();
        let err = config
            .load_config("Player", "/definitely/not/here/Player.toml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn ensure_loaded_without_root_is_false() {
        let mut config = ConfigManager::new();
        assert!(!config.ensure_loaded("Player"));
        let mut config = manager();
        assert!(config.ensure_loaded("Player"));
    }

    #[test]
    fn string_arrays() {
        let mut config = ConfigManager::new();
        config
            .load_config_str("Levels", "[level_1]\nlayout = [\"NN\", \"..S\"]\n")
            .unwrap();
        assert_eq!(
            config.get_string_array("Levels", "level_1", "layout"),
            vec!["NN".to_owned(), "..S".to_owned()]
        );
        assert!(config.get_string_array("Levels", "level_2", "layout").is_empty());
        assert!(config.has_section("Levels", "level_1"));
        assert!(!config.has_section("Levels", "level_2"));
    }
}
