/// Structured logging for the water-quality service
///
/// Every event carries a `source` component tag and, where relevant, the
/// monitored location. Output goes to the console and optionally to a
/// daily-rotated log file for daemon operation. Built on `tracing`; the
/// helpers here only standardise the fields.

use std::fmt;
use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config::LoggingConfig;
use crate::store::StoreError;

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Api,
    Database,
    Engine,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Api => write!(f, "API"),
            Component::Database => write!(f, "DB"),
            Component::Engine => write!(f, "ENGINE"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - e.g. the database is still starting up
    Expected,
    /// Unexpected failure - indicates service degradation or configuration issue
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Initialisation
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("Logger already initialised: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides `config.level`. When a log file is configured the
/// returned guard must be held for the life of the process, or buffered
/// lines are lost on exit.
pub fn init_logger(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LogInitError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false));

    match &config.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "nirmal_dhara.log".into());
            let appender = tracing_appender::rolling::daily(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            registry.try_init()?;
            Ok(None)
        }
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Log a general informational message
pub fn info(source: Component, location: Option<&str>, message: &str) {
    tracing::info!(source = %source, location = location.unwrap_or("-"), "{message}");
}

/// Log a warning message
pub fn warn(source: Component, location: Option<&str>, message: &str) {
    tracing::warn!(source = %source, location = location.unwrap_or("-"), "{message}");
}

/// Log an error message
pub fn error(source: Component, location: Option<&str>, message: &str) {
    tracing::error!(source = %source, location = location.unwrap_or("-"), "{message}");
}

/// Log a debug message
pub fn debug(source: Component, location: Option<&str>, message: &str) {
    tracing::debug!(source = %source, location = location.unwrap_or("-"), "{message}");
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Classify a baseline store failure
pub fn classify_store_failure(err: &StoreError) -> FailureType {
    match err {
        StoreError::MissingSchema(_) => FailureType::Unexpected,
        StoreError::Database(db) if db.is_closed() => FailureType::Expected,
        StoreError::Database(db) if db.as_db_error().is_some() => FailureType::Unexpected,
        StoreError::Database(_) | StoreError::Unavailable(_) => FailureType::Unknown,
    }
}

/// Log a store failure with automatic classification
pub fn log_store_failure(location: &str, operation: &str, err: &StoreError) {
    let failure_type = classify_store_failure(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(Component::Database, Some(location), &message),
        FailureType::Unexpected => error(Component::Database, Some(location), &message),
        FailureType::Unknown => warn(Component::Database, Some(location), &message),
    }
}
