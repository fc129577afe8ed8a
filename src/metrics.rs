/// Metric registry for the Nirmal Dhara water-quality service.
///
/// Defines one descriptor per tracked metric: display title, unit, forecast
/// sensitivity, rounding and map-segment thresholds. This is the single
/// source of truth for per-metric constants. The model, simulation, alert and
/// report modules look metrics up here rather than keeping their own tables.

use crate::model::{Metric, SegmentStatus};

// ---------------------------------------------------------------------------
// Threshold types
// ---------------------------------------------------------------------------

/// Which side of a threshold is worse for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Pollutant-style metric: values above the threshold are worse.
    HigherIsWorse,
    /// Quantity-style metric (flow, level): values below the threshold are worse.
    LowerIsWorse,
}

/// Warning/danger threshold pair used to colour river segments.
///
/// For `HigherIsWorse` metrics `warning < danger`; for `LowerIsWorse`
/// metrics `warning > danger`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentThresholds {
    pub warning: f64,
    pub danger: f64,
    pub direction: Direction,
}

impl SegmentThresholds {
    /// Classifies `value` against this pair. Danger is checked first.
    pub fn classify(&self, value: f64) -> SegmentStatus {
        let worse_than = |threshold: f64| match self.direction {
            Direction::HigherIsWorse => value > threshold,
            Direction::LowerIsWorse => value < threshold,
        };

        if worse_than(self.danger) {
            SegmentStatus::Danger
        } else if worse_than(self.warning) {
            SegmentStatus::Warning
        } else {
            SegmentStatus::Safe
        }
    }
}

// ---------------------------------------------------------------------------
// Metric metadata
// ---------------------------------------------------------------------------

/// Metadata for a single tracked metric.
#[derive(Debug)]
pub struct MetricDescriptor {
    pub metric: Metric,
    /// Public key used in JSON payloads and URLs.
    pub key: &'static str,
    /// Other keys accepted when parsing; `water_level` is the baseline
    /// field behind `level`.
    pub aliases: &'static [&'static str],
    /// Chart title shown on the dashboard; ends with the unit in parentheses.
    pub title: &'static str,
    pub unit: &'static str,
    /// Value used when a location's baseline is created.
    pub historical_default: f64,
    /// Forecast sensitivity: the shared randomness is multiplied by
    /// `forecast_scale * offset_days`.
    pub forecast_scale: f64,
    /// Decimal places kept in forecast values.
    pub forecast_decimals: u32,
    /// Segment thresholds, if the map colours this metric.
    pub thresholds: Option<SegmentThresholds>,
}

/// All tracked metrics, in dashboard order.
///
/// Rainfall's `forecast_scale` is its per-day span; the rainfall forecast
/// uses its own biased draw (see `simulate::forecast`).
pub static METRIC_REGISTRY: &[MetricDescriptor] = &[
    MetricDescriptor {
        metric: Metric::FecalColiform,
        key: "fecal_coliform",
        aliases: &[],
        title: "Fecal Coliform Analysis (MPN/100ml)",
        unit: "MPN/100ml",
        historical_default: 500.0,
        forecast_scale: 250.0,
        forecast_decimals: 0,
        thresholds: Some(SegmentThresholds {
            warning: 500.0,
            danger: 1000.0,
            direction: Direction::HigherIsWorse,
        }),
    },
    MetricDescriptor {
        metric: Metric::Flow,
        key: "flow",
        aliases: &[],
        title: "Ganga Flow Analysis (m³/s)",
        unit: "m³/s",
        historical_default: 1400.0,
        forecast_scale: 150.0,
        forecast_decimals: 0,
        thresholds: Some(SegmentThresholds {
            warning: 1000.0,
            danger: 500.0,
            direction: Direction::LowerIsWorse,
        }),
    },
    MetricDescriptor {
        metric: Metric::Nitrate,
        key: "nitrate",
        aliases: &[],
        title: "Nitrate Presence Analysis (mg/L)",
        unit: "mg/L",
        historical_default: 5.5,
        forecast_scale: 2.0,
        forecast_decimals: 1,
        thresholds: Some(SegmentThresholds {
            warning: 7.0,
            danger: 10.0,
            direction: Direction::HigherIsWorse,
        }),
    },
    MetricDescriptor {
        metric: Metric::Rainfall,
        key: "rainfall",
        aliases: &[],
        title: "Rainfall Analysis (mm)",
        unit: "mm",
        historical_default: 10.0,
        forecast_scale: 5.0,
        forecast_decimals: 1,
        thresholds: None,
    },
    MetricDescriptor {
        metric: Metric::Temperature,
        key: "temperature",
        aliases: &[],
        title: "Water Temperature Analysis (°C)",
        unit: "°C",
        historical_default: 23.0,
        forecast_scale: 0.5,
        forecast_decimals: 1,
        thresholds: None,
    },
    MetricDescriptor {
        metric: Metric::Level,
        key: "level",
        aliases: &["water_level"],
        title: "Water Level Analysis (Meters)",
        unit: "Meters",
        historical_default: 70.5,
        forecast_scale: 1.5,
        forecast_decimals: 1,
        thresholds: Some(SegmentThresholds {
            warning: 68.0,
            danger: 65.0,
            direction: Direction::LowerIsWorse,
        }),
    },
    MetricDescriptor {
        metric: Metric::Bod,
        key: "bod",
        aliases: &[],
        title: "Biochemical Oxygen Demand (mg/L)",
        unit: "mg/L",
        historical_default: 2.5,
        forecast_scale: 1.5,
        forecast_decimals: 1,
        thresholds: Some(SegmentThresholds {
            warning: 5.0,
            danger: 8.0,
            direction: Direction::HigherIsWorse,
        }),
    },
];

/// Looks up the descriptor for `metric`.
///
/// The registry is laid out in `Metric` declaration order (enforced by the
/// registry tests), so the variant's discriminant is its index.
pub fn descriptor(metric: Metric) -> &'static MetricDescriptor {
    &METRIC_REGISTRY[metric as usize]
}

/// Looks up a descriptor by public key or alias.
/// Returns `None` for keys that are not tracked metrics.
pub fn find_metric(key: &str) -> Option<&'static MetricDescriptor> {
    METRIC_REGISTRY
        .iter()
        .find(|d| d.key == key || d.aliases.contains(&key))
}

/// Rounds `value` to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
