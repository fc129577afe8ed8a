/// Service configuration.
///
/// Settings come from an optional TOML file (`nirmal_dhara.toml`, or the
/// path in `NIRMAL_CONFIG`) layered under environment variables loaded via
/// `dotenv`:
///   - `DATABASE_URL`: PostgreSQL connection string; without it the
///     service falls back to the in-memory baseline store.
///   - `PORT`: overrides the port of `server.bind_addr`.
///
/// A missing file means defaults. A file that exists but does not parse is
/// a startup error.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::DEFAULT_LOCATION;
use crate::simulate::HistoryParams;
use crate::simulate::forecast::DEFAULT_HORIZON_DAYS;
use crate::simulate::history::{DEFAULT_AGE_STEP, DEFAULT_HISTORY_DAYS, DEFAULT_SPREAD};

pub const DEFAULT_CONFIG_PATH: &str = "nirmal_dhara.toml";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Location whose baseline backs the dashboard.
    pub location: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            location: DEFAULT_LOCATION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub history_days: usize,
    pub history_spread: f64,
    pub history_age_step: f64,
    pub horizon_days: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            history_days: DEFAULT_HISTORY_DAYS,
            history_spread: DEFAULT_SPREAD,
            history_age_step: DEFAULT_AGE_STEP,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

impl SimulationConfig {
    pub fn history_params(&self) -> HistoryParams {
        HistoryParams {
            days: self.history_days,
            spread: self.history_spread,
            age_step: self.history_age_step,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `nirmal_dhara_service=debug`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Optional log file; rotated daily.
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
    /// Never read from the file; secrets stay in the environment.
    #[serde(skip)]
    pub database_url: Option<String>,
}

impl AppConfig {
    /// Loads `.env`, then the config file, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let path = std::env::var("NIRMAL_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = Self::from_file_or_default(&path)?;
        config.apply_env(
            std::env::var("PORT").ok().as_deref(),
            std::env::var("DATABASE_URL").ok(),
        )?;
        config.validate()?;
        Ok(config)
    }

    /// Parses `path` if it exists; otherwise returns the defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `PORT` and `DATABASE_URL`. Empty values are ignored.
    pub fn apply_env(
        &mut self,
        port: Option<&str>,
        database_url: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(port) = port.filter(|p| !p.trim().is_empty()) {
            let port: u16 = port.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("PORT must be a port number, got '{port}'"))
            })?;
            let host = self
                .server
                .bind_addr
                .rsplit_once(':')
                .map(|(host, _)| host)
                .unwrap_or("0.0.0.0");
            self.server.bind_addr = format!("{host}:{port}");
        }
        if let Some(url) = database_url.filter(|u| !u.trim().is_empty()) {
            self.database_url = Some(url);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.history_days == 0 {
            return Err(ConfigError::Invalid("simulation.history_days must be at least 1".into()));
        }
        if sim.horizon_days == 0 {
            return Err(ConfigError::Invalid("simulation.horizon_days must be at least 1".into()));
        }
        for (name, value) in [
            ("simulation.history_spread", sim.history_spread),
            ("simulation.history_age_step", sim.history_age_step),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if self.server.location.trim().is_empty() {
            return Err(ConfigError::Invalid("server.location must not be empty".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
