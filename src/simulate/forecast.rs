/// Forward forecast per metric with alert evaluation.
///
/// For each offset `i` (days ahead) one shared centred draw drives the
/// correlated metrics so a forecast point stays internally consistent:
///
///   predicted = baseline + randomness * i * forecast_scale
///
/// Rainfall gets its own draw, biased toward increase and floored at zero:
///
///   rainfall = max(0, baseline + (U - 0.5 - 0.1) * 5 * i)
///
/// Draw order per offset is fixed (shared draw, then rainfall) so a seeded
/// source reproduces the same forecast.
///
/// # Clock injection
/// `generate_forecast_at` takes the reference date explicitly; use it in
/// tests. `generate_forecast` wraps it with today's UTC date.

use chrono::{Duration, NaiveDate, Utc};
use std::collections::BTreeMap;

use crate::alert::evaluate_alerts;
use crate::metrics::{METRIC_REGISTRY, round_to};
use crate::model::{BaselineReading, ForecastPoint, Metric};
use crate::random::RandomSource;

pub const DEFAULT_HORIZON_DAYS: u32 = 3;

/// Downward shift of the rainfall draw; a positive bias toward more rain.
const RAINFALL_BIAS: f64 = 0.1;

/// Builds one `ForecastPoint` per offset `1..=horizon_days`, dated
/// `today + offset`.
pub fn generate_forecast_at(
    baseline: &BaselineReading,
    horizon_days: u32,
    today: NaiveDate,
    rng: &mut dyn RandomSource,
) -> Vec<ForecastPoint> {
    (1..=horizon_days)
        .map(|offset| {
            let predicted_values = predict_offset(baseline, offset, rng);
            let triggered_alerts = evaluate_alerts(&predicted_values);
            ForecastPoint {
                date: today + Duration::days(i64::from(offset)),
                predicted_values,
                triggered_alerts,
            }
        })
        .collect()
}

/// Convenience wrapper that dates the forecast from the current UTC day.
pub fn generate_forecast(
    baseline: &BaselineReading,
    horizon_days: u32,
    rng: &mut dyn RandomSource,
) -> Vec<ForecastPoint> {
    generate_forecast_at(baseline, horizon_days, Utc::now().date_naive(), rng)
}

fn predict_offset(
    baseline: &BaselineReading,
    offset: u32,
    rng: &mut dyn RandomSource,
) -> BTreeMap<Metric, f64> {
    let days = f64::from(offset);
    let randomness = rng.next_centered();
    let rainfall_draw = rng.next_centered() - RAINFALL_BIAS;

    METRIC_REGISTRY
        .iter()
        .map(|d| {
            let base = baseline.value(d.metric);
            let raw = match d.metric {
                Metric::Rainfall => (base + rainfall_draw * d.forecast_scale * days).max(0.0),
                _ => base + randomness * days * d.forecast_scale,
            };
            (d.metric, round_to(raw, d.forecast_decimals))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use crate::random::{FixedSequence, SeededSource};
    use chrono::TimeZone;

    fn baseline() -> BaselineReading {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap();
        BaselineReading::with_defaults("Varanasi", now)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_forecast_has_one_point_per_offset_dated_ahead() {
        let mut rng = SeededSource::new(3);
        let points = generate_forecast_at(&baseline(), 3, today(), &mut rng);
        let dates: Vec<String> = points.iter().map(|p| p.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-05-02", "2024-05-03", "2024-05-04"]);
    }

    #[test]
    fn test_every_point_predicts_all_metrics() {
        let mut rng = SeededSource::new(3);
        for point in generate_forecast_at(&baseline(), 3, today(), &mut rng) {
            for metric in Metric::ALL {
                assert!(point.predicted(metric).is_some(), "missing {metric} on {}", point.date);
            }
        }
    }

    #[test]
    fn test_zero_randomness_reproduces_baseline() {
        let mut rng = FixedSequence::constant(0.5);
        let points = generate_forecast_at(&baseline(), 1, today(), &mut rng);
        let point = &points[0];
        assert_eq!(point.predicted(Metric::FecalColiform), Some(500.0));
        assert_eq!(point.predicted(Metric::Flow), Some(1400.0));
        assert_eq!(point.predicted(Metric::Level), Some(70.5));
        assert_eq!(point.predicted(Metric::Bod), Some(2.5));
        // Rainfall carries the -0.1 bias: 10 + (-0.1 * 5 * 1).
        assert_eq!(point.predicted(Metric::Rainfall), Some(9.5));
    }

    #[test]
    fn test_shared_draw_scales_with_offset() {
        // Shared draw U=1.0-ε → randomness ≈ +0.5; rainfall draw U=0.5.
        let mut rng = FixedSequence::new(&[1.0, 0.5]);
        let points = generate_forecast_at(&baseline(), 3, today(), &mut rng);
        let flows: Vec<f64> = points.iter().map(|p| p.predicted(Metric::Flow).unwrap()).collect();
        assert_eq!(flows, vec![1475.0, 1550.0, 1625.0]);
        let nitrates: Vec<f64> = points
            .iter()
            .map(|p| p.predicted(Metric::Nitrate).unwrap())
            .collect();
        assert_eq!(nitrates, vec![6.5, 7.5, 8.5]);
    }

    #[test]
    fn test_rainfall_is_floored_at_zero() {
        let mut dry = baseline();
        dry.rainfall = 0.0;
        let mut rng = FixedSequence::constant(0.0);
        for point in generate_forecast_at(&dry, 3, today(), &mut rng) {
            assert_eq!(point.predicted(Metric::Rainfall), Some(0.0));
        }
    }

    #[test]
    fn test_integer_metrics_have_no_fraction() {
        let mut rng = SeededSource::new(11);
        for point in generate_forecast_at(&baseline(), 3, today(), &mut rng) {
            for metric in [Metric::FecalColiform, Metric::Flow] {
                let v = point.predicted(metric).unwrap();
                assert_eq!(v.fract(), 0.0, "{metric} should be whole, got {v}");
            }
        }
    }

    #[test]
    fn test_alerts_are_evaluated_per_point() {
        let mut polluted = baseline();
        polluted.bod = 9.0;
        let mut rng = FixedSequence::constant(0.5);
        let points = generate_forecast_at(&polluted, 2, today(), &mut rng);
        for point in &points {
            assert_eq!(point.triggered_alerts.len(), 1);
            assert_eq!(point.triggered_alerts[0].severity, Severity::Danger);
        }
    }
}
