//! Core error types for embers-core.
//!
//! Each concern gets its own thiserror enum; [`CoreError`] aggregates them
//! for callers that only want a single error type.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for embers-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Ledger-related errors
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Habit/badge definition errors
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the day-record store.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Date argument is not `YYYY-MM-DD`
    #[error("Invalid date format '{value}'. Expected YYYY-MM-DD.")]
    InvalidDateFormat { value: String },

    /// Mutation of a date after today
    #[error("Future dates are not editable ({date} is after {today}).")]
    FutureDateNotEditable {
        date: chrono::NaiveDate,
        today: chrono::NaiveDate,
    },

    /// Mutation of a locked day
    #[error("Day {date} is locked. Unlock it first to edit.")]
    DayLocked { date: chrono::NaiveDate },

    /// Reading or writing the ledger document failed
    #[error("Ledger IO failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding the ledger document failed
    #[error("Failed to encode ledger document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Atomic replace of the ledger document failed
    #[error("Failed to persist ledger to {path}: {message}")]
    Persist { path: PathBuf, message: String },

    /// Full reset rejected
    #[error("Reset rejected: invalid confirmation phrase. Use {expected}.")]
    ResetRejected { expected: &'static str },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Errors raised while loading habit/badge definitions.
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Failed to read definitions file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse definitions TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate habit id '{0}'")]
    DuplicateHabit(String),

    #[error("Duplicate badge id '{0}'")]
    DuplicateBadge(String),

    #[error("Habit '{habit}' has an invalid {field} date '{value}'")]
    InvalidDate {
        habit: String,
        field: &'static str,
        value: String,
    },
}

/// Errors raised while rendering the CSV export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
