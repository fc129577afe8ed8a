/// Synthetic historical series.
///
/// Each sample is the baseline value perturbed by a bounded relative
/// jitter: `baseline * (1 + (U - 0.5) * spread)`. Older samples may use a
/// wider spread (`age_step` per day of age) to represent lower confidence
/// in reconstructed data.

use chrono::{Duration, NaiveDate};

use crate::metrics::round_to;
use crate::model::{BaselineReading, EngineError, Metric};
use crate::random::RandomSource;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

pub const DEFAULT_HISTORY_DAYS: usize = 10;
pub const DEFAULT_SPREAD: f64 = 0.2;
pub const DEFAULT_AGE_STEP: f64 = 0.0;

/// Shape of a generated history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryParams {
    /// Number of samples, one per calendar day.
    pub days: usize,
    /// Base relative fluctuation (0.2 → ±10% around the baseline).
    pub spread: f64,
    /// Extra spread added per day of sample age.
    pub age_step: f64,
}

impl Default for HistoryParams {
    fn default() -> Self {
        Self {
            days: DEFAULT_HISTORY_DAYS,
            spread: DEFAULT_SPREAD,
            age_step: DEFAULT_AGE_STEP,
        }
    }
}

impl HistoryParams {
    /// Spread applied to a sample `age` days old (0 = newest).
    pub fn spread_at_age(&self, age: usize) -> f64 {
        self.spread + age as f64 * self.age_step
    }

    /// Widest spread used in the series (the oldest sample's).
    pub fn max_spread(&self) -> f64 {
        self.spread_at_age(self.days.saturating_sub(1))
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generates `params.days` samples for `metric`, ordered oldest → newest,
/// each rounded to one decimal place.
pub fn generate_history(
    baseline: &BaselineReading,
    metric: Metric,
    params: &HistoryParams,
    rng: &mut dyn RandomSource,
) -> Vec<f64> {
    let base = baseline.value(metric);
    (0..params.days)
        .map(|index| {
            let age = params.days - 1 - index;
            let jitter = rng.next_centered() * params.spread_at_age(age);
            round_to(base * (1.0 + jitter), 1)
        })
        .collect()
}

/// Same as `generate_history`, but takes the metric as a string key.
///
/// Returns `EngineError::UnknownMetric` if the key does not name a tracked
/// metric. That is a caller defect, never a user-input problem.
pub fn generate_history_for_key(
    baseline: &BaselineReading,
    metric_key: &str,
    params: &HistoryParams,
    rng: &mut dyn RandomSource,
) -> Result<Vec<f64>, EngineError> {
    let metric: Metric = metric_key.parse()?;
    Ok(generate_history(baseline, metric, params, rng))
}

/// Calendar-day labels for a `days`-long history ending `today`,
/// formatted `YYYY-MM-DD`, oldest first.
pub fn history_labels(today: NaiveDate, days: usize) -> Vec<String> {
    (0..days)
        .rev()
        .map(|age| (today - Duration::days(age as i64)).format("%Y-%m-%d").to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
