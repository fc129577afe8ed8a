/// River segment status for the map view.
///
/// A metric's latest historical value is classified against the metric's
/// threshold pair from the registry. Flow and level are inverted: lower
/// values are worse. The overall status then picks a fixed pool of seven
/// segment statuses, shuffled across the monitored ghats.

use serde::Serialize;

use crate::metrics::{SegmentThresholds, descriptor};
use crate::model::{Metric, SegmentStatus};
use crate::random::RandomSource;

// ---------------------------------------------------------------------------
// Segment registry
// ---------------------------------------------------------------------------

/// A stretch of river drawn as one polyline on the map.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RiverSegment {
    pub name: &'static str,
    /// Start and end points, `[latitude, longitude]` in WGS84.
    pub coords: [[f64; 2]; 2],
}

/// Monitored ghats along the Ganga at Varanasi, upstream to downstream.
pub static RIVER_SEGMENTS: &[RiverSegment] = &[
    RiverSegment { name: "Assi Ghat", coords: [[25.2852, 82.9922], [25.2890, 82.9950]] },
    RiverSegment { name: "Tulsi Ghat", coords: [[25.2890, 82.9950], [25.2930, 82.9980]] },
    RiverSegment { name: "Harishchandra Ghat", coords: [[25.2930, 82.9980], [25.2960, 83.0006]] },
    RiverSegment { name: "Kedar Ghat", coords: [[25.2960, 83.0006], [25.3000, 83.0040]] },
    RiverSegment { name: "Dashashwamedh Ghat", coords: [[25.3000, 83.0040], [25.3072, 83.0088]] },
    RiverSegment { name: "Manikarnika Ghat", coords: [[25.3072, 83.0088], [25.3110, 83.0120]] },
    RiverSegment { name: "Raj Ghat", coords: [[25.3110, 83.0120], [25.3215, 83.0250]] },
];

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classifies `value` against explicit thresholds.
pub fn classify_against(value: f64, thresholds: &SegmentThresholds) -> SegmentStatus {
    thresholds.classify(value)
}

/// Classifies a metric's latest historical value using its registry
/// thresholds. Metrics without thresholds (rainfall, temperature) are
/// always `Safe`.
pub fn classify_segment_status(metric: Metric, latest_value: f64) -> SegmentStatus {
    descriptor(metric)
        .thresholds
        .as_ref()
        .map_or(SegmentStatus::Safe, |t| t.classify(latest_value))
}

// ---------------------------------------------------------------------------
// Distribution across segments
// ---------------------------------------------------------------------------

/// Status pool for each overall status; one entry per river segment.
fn status_pool(overall: SegmentStatus) -> [SegmentStatus; 7] {
    use SegmentStatus::{Danger as D, Safe as S, Warning as W};
    match overall {
        SegmentStatus::Safe => [S, S, S, S, W, S, S],
        SegmentStatus::Warning => [W, S, W, D, W, S, W],
        SegmentStatus::Danger => [D, W, D, D, W, D, D],
    }
}

/// Shuffles the pool for `overall` (Fisher–Yates) and returns one status per
/// entry of `RIVER_SEGMENTS`, in registry order.
pub fn distribute_segment_statuses(
    overall: SegmentStatus,
    rng: &mut dyn RandomSource,
) -> Vec<SegmentStatus> {
    let mut pool = status_pool(overall);
    for i in (1..pool.len()).rev() {
        let j = ((rng.next_uniform() * (i + 1) as f64) as usize).min(i);
        pool.swap(i, j);
    }
    pool.into_iter().take(RIVER_SEGMENTS.len()).collect()
}

/// One coloured segment of the map.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentView {
    pub name: &'static str,
    pub coords: [[f64; 2]; 2],
    pub status: SegmentStatus,
}

/// Map payload for one metric.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentReport {
    pub metric: Metric,
    pub latest_value: f64,
    pub overall_status: SegmentStatus,
    pub segments: Vec<SegmentView>,
}

/// Classifies `latest_value` and colours every river segment.
pub fn segment_report(
    metric: Metric,
    latest_value: f64,
    rng: &mut dyn RandomSource,
) -> SegmentReport {
    let overall_status = classify_segment_status(metric, latest_value);
    let segments = RIVER_SEGMENTS
        .iter()
        .zip(distribute_segment_statuses(overall_status, rng))
        .map(|(segment, status)| SegmentView {
            name: segment.name,
            coords: segment.coords,
            status,
        })
        .collect();

    SegmentReport {
        metric,
        latest_value,
        overall_status,
        segments,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
