/// Synthetic history and forecast generation.
///
/// Everything here is a pure function of a baseline reading, a few
/// parameters and an injected `RandomSource`. Nothing is cached or
/// persisted; the HTTP layer recomputes both series on every request.
///
/// Submodules:
/// - `history`: jittered past readings per metric.
/// - `forecast`: per-day predictions plus alert evaluation.

pub mod forecast;
pub mod history;

pub use forecast::{DEFAULT_HORIZON_DAYS, generate_forecast, generate_forecast_at};
pub use history::{HistoryParams, generate_history, generate_history_for_key, history_labels};
