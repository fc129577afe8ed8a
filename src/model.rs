/// BaselineReading, Metric, Alert, ForecastPoint, SegmentStatus, EngineError
/// core data structures and error handling
///
/// Core data types for the Nirmal Dhara water-quality service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond key parsing, no I/O and no randomness.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::metrics::{descriptor, find_metric};

/// Location served by the dashboard when none is configured.
pub const DEFAULT_LOCATION: &str = "Varanasi";

// ---------------------------------------------------------------------------
// Metric keys
// ---------------------------------------------------------------------------

/// The seven tracked metrics, in dashboard order.
///
/// Serialized with the public keys the dashboard uses. `Level` is the only
/// metric whose key differs from its baseline field (`water_level`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    FecalColiform,
    Flow,
    Nitrate,
    Rainfall,
    Temperature,
    Level,
    Bod,
}

impl Metric {
    /// All metrics in the order the dashboard renders them.
    pub const ALL: [Metric; 7] = [
        Metric::FecalColiform,
        Metric::Flow,
        Metric::Nitrate,
        Metric::Rainfall,
        Metric::Temperature,
        Metric::Level,
        Metric::Bod,
    ];

    /// Public key used in JSON payloads and URLs.
    pub fn key(self) -> &'static str {
        descriptor(self).key
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = EngineError;

    /// Accepts the public keys plus registry aliases such as `water_level`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        find_metric(s)
            .map(|d| d.metric)
            .ok_or_else(|| EngineError::UnknownMetric(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// The single current-truth measurement set for a monitored location.
///
/// Exactly one baseline exists per location. Stores create it lazily with
/// `BaselineReading::with_defaults` the first time a location is requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineReading {
    pub location: String,
    pub fecal_coliform: f64, // MPN/100ml
    pub flow: f64,           // m³/s
    pub nitrate: f64,        // mg/L
    pub rainfall: f64,       // mm
    pub temperature: f64,    // °C
    pub water_level: f64,    // meters
    pub bod: f64,            // mg/L
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

impl BaselineReading {
    /// Baseline with each metric's registry default, stamped `last_updated`.
    pub fn with_defaults(location: &str, last_updated: DateTime<Utc>) -> Self {
        let default_for = |metric: Metric| descriptor(metric).historical_default;
        BaselineReading {
            location: location.to_string(),
            fecal_coliform: default_for(Metric::FecalColiform),
            flow: default_for(Metric::Flow),
            nitrate: default_for(Metric::Nitrate),
            rainfall: default_for(Metric::Rainfall),
            temperature: default_for(Metric::Temperature),
            water_level: default_for(Metric::Level),
            bod: default_for(Metric::Bod),
            last_updated,
        }
    }

    /// Baseline value backing `metric`.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::FecalColiform => self.fecal_coliform,
            Metric::Flow => self.flow,
            Metric::Nitrate => self.nitrate,
            Metric::Rainfall => self.rainfall,
            Metric::Temperature => self.temperature,
            Metric::Level => self.water_level,
            Metric::Bod => self.bod,
        }
    }
}

// ---------------------------------------------------------------------------
// Alert & forecast types
// ---------------------------------------------------------------------------

/// Alert severity tiers, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Danger,
}

/// A human-readable alert raised when a predicted value crosses a threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub metric: Metric,
    pub severity: Severity,
    pub message: String,
}

/// Predicted values for one forecast offset, plus the alerts they trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Calendar date of the prediction (serialized as `YYYY-MM-DD`).
    pub date: NaiveDate,
    pub predicted_values: BTreeMap<Metric, f64>,
    pub triggered_alerts: Vec<Alert>,
}

impl ForecastPoint {
    /// Predicted value for `metric`. Every forecast point carries all seven
    /// metrics, so this only returns `None` for hand-built points.
    pub fn predicted(&self, metric: Metric) -> Option<f64> {
        self.predicted_values.get(&metric).copied()
    }
}

/// Map-segment classification of a metric's latest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentStatus {
    Safe,
    Warning,
    Danger,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Caller-contract violations reported by the simulation engine.
///
/// The engine performs no I/O, so these never indicate bad user data: they
/// mean a caller asked for a metric that does not exist.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Configuration error: the metric key is not one of the tracked metrics.
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
