//! Nirmal Dhara water-quality prediction service.
//!
//! Synthesizes recent history and a short forecast for a river location's
//! water-quality metrics from a single stored baseline, evaluates alert
//! thresholds, and serves the result to the dashboard over HTTP.

pub mod alert;
pub mod config;
pub mod db;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod random;
pub mod report;
pub mod server;
pub mod simulate;
pub mod store;
