/// Threshold checking for forecast points and river segments.
///
/// `rules` turns predicted values into severity-tagged alerts using a
/// declarative rule table. `segments` classifies a metric's latest value
/// into a map status and spreads that status across the river segments.

pub mod rules;
pub mod segments;

pub use rules::{ALERT_RULES, AlertRule, Condition, evaluate_alerts};
pub use segments::{
    RIVER_SEGMENTS, RiverSegment, SegmentReport, SegmentView, classify_against,
    classify_segment_status, distribute_segment_statuses, segment_report,
};
