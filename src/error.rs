//! Error types for locale parsing, settings persistence and override updates.

use thiserror::Error;

/// Errors produced while parsing a language tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("Locale tag is empty")]
    Empty,

    #[error("Invalid locale tag: '{0}'")]
    InvalidTag(String),

    #[error("Locale '{0}' has a region and is not a neutral locale")]
    NotNeutral(String),

    #[error("Locale '{0}' has no region and is not a specific locale")]
    NotSpecific(String),
}

/// Errors produced by a settings store.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file {path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Setting '{0}' is not a string")]
    NotAString(String),

    #[error("Settings store unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by the override resolver.
#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to persist culture overrides: {0}")]
    Persistence(#[from] SettingsError),

    #[error("Culture override lock was poisoned")]
    LockPoisoned,
}
