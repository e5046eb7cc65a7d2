//! Settings stores holding the persisted override string.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SettingsError;

/// Storage for a single string-valued setting.
pub trait SettingsStore {
    /// Read the current value. `Ok(None)` means the setting was never written.
    fn get(&self) -> Result<Option<String>, SettingsError>;

    /// Replace the current value.
    fn set(&mut self, value: &str) -> Result<(), SettingsError>;
}

/// Settings kept in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    value: Option<String>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self) -> Result<Option<String>, SettingsError> {
        Ok(self.value.clone())
    }

    fn set(&mut self, value: &str) -> Result<(), SettingsError> {
        self.value = Some(value.to_string());
        Ok(())
    }
}

/// One named setting inside a JSON object file.
///
/// Other keys in the file are left untouched on write. A missing file reads
/// as an unset value, and parent directories are created on first write.
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
    key: String,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn read_document(&self) -> Result<Map<String, Value>, SettingsError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&content).map_err(|source| SettingsError::Json {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn get(&self) -> Result<Option<String>, SettingsError> {
        let document = self.read_document()?;

        match document.get(&self.key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(SettingsError::NotAString(self.key.clone())),
        }
    }

    fn set(&mut self, value: &str) -> Result<(), SettingsError> {
        let mut document = self.read_document()?;
        document.insert(self.key.clone(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let content = serde_json::to_string_pretty(&document).map_err(|source| SettingsError::Json {
            path: self.path.display().to_string(),
            source,
        })?;
        fs::write(&self.path, content).map_err(|source| self.io_error(source))?;

        debug!("Wrote setting '{}' to {}", self.key, self.path.display());
        Ok(())
    }
}
