//! JSON-backed core configuration.
//!
//! # Responsibility
//! - Load, default and persist the engine-facing settings.
//! - Choose the active schema (custom over default).
//!
//! # Invariants
//! - A missing file is replaced with written defaults, never an error.
//! - Unknown keys on disk are ignored; missing keys take their defaults.
//! - Saves are atomic (temp file + rename).

use crate::schema::DEFAULT_SCHEMA;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

/// Errors from configuration I/O.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config i/o error: {err}"),
            Self::Json(err) => write!(f, "config parse error: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Engine-facing settings. Per-field serde defaults let a partial file on
/// disk merge over the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CoreConfig {
    /// Baseline hierarchy restored by "use default schema".
    pub default_schema: Vec<String>,
    /// User-selected hierarchy; empty means "use default".
    pub custom_schema: Vec<String>,
    /// Cap on recorded undoable mutations.
    pub undo_redo_limit: usize,
    /// Whether collaborators persist after each mutation.
    pub autosave: bool,
    /// Skip interactive confirmation prompts (CLI concern).
    pub assume_yes: bool,
    /// Tree document location, relative to the app data directory.
    pub data_path: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_schema: DEFAULT_SCHEMA.iter().map(|label| label.to_string()).collect(),
            custom_schema: Vec::new(),
            undo_redo_limit: 50,
            autosave: true,
            assume_yes: false,
            data_path: "data/node_data.json".to_string(),
        }
    }
}

impl CoreConfig {
    /// Schema labels to activate: custom when non-empty, else default.
    pub fn active_schema(&self) -> &[String] {
        if self.custom_schema.is_empty() {
            &self.default_schema
        } else {
            &self.custom_schema
        }
    }

    /// Loads config from `path`; writes and returns defaults when absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }
        let body = fs::read_to_string(path)?;
        let config = serde_json::from_str(&body)?;
        Ok(config)
    }

    /// Persists the config atomically.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string_pretty(self)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp_path = Path::new(&tmp);
        fs::write(tmp_path, body.as_bytes())?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }
}
