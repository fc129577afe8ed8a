/// Forecast alert rules.
///
/// Rules are data, not control flow: each `AlertRule` names a metric, a
/// condition on its predicted value, a severity and a message template.
/// `evaluate_alerts` walks the table in order and fires every rule that
/// matches, so one forecast point can raise several alerts.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::{Alert, Metric, Severity};

/// Placeholder replaced by the predicted value in message templates.
const VALUE_PLACEHOLDER: &str = "{value}";

/// Condition on a predicted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// `value > threshold`
    Above(f64),
    /// `lower < value <= upper`
    Between { lower: f64, upper: f64 },
    /// `value < threshold`
    Below(f64),
}

impl Condition {
    pub fn check(&self, value: f64) -> bool {
        match *self {
            Condition::Above(threshold) => value > threshold,
            Condition::Between { lower, upper } => value > lower && value <= upper,
            Condition::Below(threshold) => value < threshold,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Above(t) => write!(f, "> {t}"),
            Condition::Between { lower, upper } => write!(f, "> {lower} and <= {upper}"),
            Condition::Below(t) => write!(f, "< {t}"),
        }
    }
}

/// One row of the alert table.
#[derive(Debug, Clone, Copy)]
pub struct AlertRule {
    pub metric: Metric,
    pub condition: Condition,
    pub severity: Severity,
    /// Message with `{value}` where the predicted value goes.
    pub template: &'static str,
}

impl AlertRule {
    /// Returns the alert if `value` satisfies this rule.
    pub fn evaluate(&self, value: f64) -> Option<Alert> {
        self.condition.check(value).then(|| Alert {
            metric: self.metric,
            severity: self.severity,
            message: self.template.replace(VALUE_PLACEHOLDER, &value.to_string()),
        })
    }
}

/// The fixed alert table, in evaluation order.
pub static ALERT_RULES: &[AlertRule] = &[
    AlertRule {
        metric: Metric::Bod,
        condition: Condition::Above(8.0),
        severity: Severity::Danger,
        template: "High BOD ({value} mg/L): Severe organic pollution.",
    },
    AlertRule {
        metric: Metric::Bod,
        condition: Condition::Between { lower: 5.0, upper: 8.0 },
        severity: Severity::Warning,
        template: "Moderate BOD ({value} mg/L): Requires monitoring.",
    },
    AlertRule {
        metric: Metric::FecalColiform,
        condition: Condition::Above(1000.0),
        severity: Severity::Danger,
        template: "Very High Fecal Coliform ({value} MPN): Unsafe for bathing.",
    },
    AlertRule {
        metric: Metric::FecalColiform,
        condition: Condition::Between { lower: 500.0, upper: 1000.0 },
        severity: Severity::Warning,
        template: "Elevated Fecal Coliform ({value} MPN).",
    },
    AlertRule {
        metric: Metric::Nitrate,
        condition: Condition::Above(10.0),
        severity: Severity::Danger,
        template: "High Nitrate ({value} mg/L): Risk of contamination.",
    },
    AlertRule {
        metric: Metric::Level,
        condition: Condition::Below(65.0),
        severity: Severity::Warning,
        template: "Low Water Level ({value} M): Monitor flow.",
    },
];

/// Runs every rule in `ALERT_RULES` against `predicted`.
///
/// Metrics missing from `predicted` are skipped.
pub fn evaluate_alerts(predicted: &BTreeMap<Metric, f64>) -> Vec<Alert> {
    ALERT_RULES
        .iter()
        .filter_map(|rule| predicted.get(&rule.metric).and_then(|&v| rule.evaluate(v)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(Metric, f64)]) -> BTreeMap<Metric, f64> {
        pairs.iter().copied().collect()
    }

    fn alerts_for(metric: Metric, value: f64) -> Vec<Alert> {
        evaluate_alerts(&values(&[(metric, value)]))
    }

    // --- BOD ----------------------------------------------------------------

    #[test]
    fn test_bod_above_eight_is_single_danger() {
        let alerts = alerts_for(Metric::Bod, 9.0);
        assert_eq!(alerts.len(), 1, "got {alerts:?}");
        assert_eq!(alerts[0].severity, Severity::Danger);
        assert_eq!(alerts[0].message, "High BOD (9 mg/L): Severe organic pollution.");
    }

    #[test]
    fn test_bod_between_five_and_eight_is_single_warning() {
        let alerts = alerts_for(Metric::Bod, 6.0);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert!(alerts[0].message.contains("6 mg/L"));
    }

    #[test]
    fn test_bod_exactly_eight_is_warning_not_danger() {
        // Danger is strictly greater than; the warning band includes its upper bound.
        let alerts = alerts_for(Metric::Bod, 8.0);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Warning);
    }

    #[test]
    fn test_bod_below_five_raises_nothing() {
        assert!(alerts_for(Metric::Bod, 3.0).is_empty());
        assert!(alerts_for(Metric::Bod, 5.0).is_empty(), "5.0 is not above 5.0");
    }

    // --- Fecal coliform -----------------------------------------------------

    #[test]
    fn test_fecal_coliform_tiers() {
        let danger = alerts_for(Metric::FecalColiform, 1200.0);
        assert_eq!(danger.len(), 1);
        assert_eq!(danger[0].severity, Severity::Danger);
        assert_eq!(danger[0].message, "Very High Fecal Coliform (1200 MPN): Unsafe for bathing.");

        let warning = alerts_for(Metric::FecalColiform, 750.0);
        assert_eq!(warning.len(), 1);
        assert_eq!(warning[0].severity, Severity::Warning);
        assert_eq!(warning[0].message, "Elevated Fecal Coliform (750 MPN).");

        assert!(alerts_for(Metric::FecalColiform, 300.0).is_empty());
    }

    // --- Nitrate & level ----------------------------------------------------

    #[test]
    fn test_high_nitrate_is_danger() {
        let alerts = alerts_for(Metric::Nitrate, 10.5);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "High Nitrate (10.5 mg/L): Risk of contamination.");
        assert!(alerts_for(Metric::Nitrate, 10.0).is_empty());
    }

    #[test]
    fn test_low_water_level_is_warning() {
        let alerts = alerts_for(Metric::Level, 64.2);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].metric, Metric::Level);
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert_eq!(alerts[0].message, "Low Water Level (64.2 M): Monitor flow.");
        assert!(alerts_for(Metric::Level, 65.0).is_empty());
    }

    // --- Table behaviour ----------------------------------------------------

    #[test]
    fn test_all_applicable_rules_fire_in_table_order() {
        let predicted = values(&[
            (Metric::Bod, 6.1),
            (Metric::FecalColiform, 1500.0),
            (Metric::Nitrate, 12.0),
            (Metric::Level, 60.0),
            (Metric::Flow, 10.0),
        ]);
        let alerts = evaluate_alerts(&predicted);
        let fired: Vec<(Metric, Severity)> =
            alerts.iter().map(|a| (a.metric, a.severity)).collect();
        assert_eq!(
            fired,
            vec![
                (Metric::Bod, Severity::Warning),
                (Metric::FecalColiform, Severity::Danger),
                (Metric::Nitrate, Severity::Danger),
                (Metric::Level, Severity::Warning),
            ]
        );
    }

    #[test]
    fn test_unruled_metrics_never_alert() {
        let predicted = values(&[
            (Metric::Flow, 0.0),
            (Metric::Rainfall, 500.0),
            (Metric::Temperature, 45.0),
        ]);
        assert!(evaluate_alerts(&predicted).is_empty());
    }

    #[test]
    fn test_every_template_has_value_placeholder() {
        for rule in ALERT_RULES {
            assert!(
                rule.template.contains(VALUE_PLACEHOLDER),
                "template for {} ({}) lacks a value placeholder",
                rule.metric,
                rule.condition
            );
        }
    }
}
