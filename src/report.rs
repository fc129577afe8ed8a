/// Dashboard payload assembly.
///
/// For each tracked metric the dashboard receives a title, a bar chart of
/// the synthetic history, a pie chart and the shared forecast:
///
/// ```json
/// { "bod": { "title": "...", "chartData": { "bar": {...}, "pie": {...} }, "predictions": [...] } }
/// ```
///
/// The pie slices are placeholder proportions drawn at random. They are not
/// derived from the alerts or thresholds and can disagree with them; the
/// dashboard treats them as decoration.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::metrics::descriptor;
use crate::model::{BaselineReading, ForecastPoint, Metric};
use crate::random::RandomSource;
use crate::simulate::{HistoryParams, generate_forecast_at, generate_history, history_labels};

pub const PIE_LABELS: [&str; 3] = ["Safe", "Warning", "Danger"];

#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
    pub labels: Vec<String>,
    /// Unit shown as the dataset label.
    pub label: &'static str,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PieChart {
    pub labels: [&'static str; 3],
    pub data: [f64; 3],
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub bar: BarChart,
    pub pie: PieChart,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricReport {
    pub title: &'static str,
    pub chart_data: ChartData,
    pub predictions: Vec<ForecastPoint>,
}

/// Per-metric reports keyed by metric; iterates in dashboard order.
pub type DashboardReport = BTreeMap<Metric, MetricReport>;

/// Random safe/warning/danger proportions: `[U*5+5, U*3+1, U*2]`.
pub fn placeholder_pie(rng: &mut dyn RandomSource) -> PieChart {
    let safe = rng.next_uniform() * 5.0 + 5.0;
    let warning = rng.next_uniform() * 3.0 + 1.0;
    let danger = rng.next_uniform() * 2.0;
    PieChart {
        labels: PIE_LABELS,
        data: [safe, warning, danger],
    }
}

/// Builds the full dashboard for `baseline`.
///
/// One forecast is generated and shared by every metric's `predictions`;
/// each metric gets its own history and pie draw.
pub fn build_dashboard(
    baseline: &BaselineReading,
    history: &HistoryParams,
    horizon_days: u32,
    today: NaiveDate,
    rng: &mut dyn RandomSource,
) -> DashboardReport {
    let predictions = generate_forecast_at(baseline, horizon_days, today, rng);
    let labels = history_labels(today, history.days);

    Metric::ALL
        .into_iter()
        .map(|metric| {
            let d = descriptor(metric);
            let report = MetricReport {
                title: d.title,
                chart_data: ChartData {
                    bar: BarChart {
                        labels: labels.clone(),
                        label: d.unit,
                        data: generate_history(baseline, metric, history, rng),
                    },
                    pie: placeholder_pie(rng),
                },
                predictions: predictions.clone(),
            };
            (metric, report)
        })
        .collect()
}
