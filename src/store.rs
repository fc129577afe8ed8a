/// Baseline persistence.
///
/// The service stores exactly one `BaselineReading` per location. A missing
/// baseline is not an error: `fetch_or_create` inserts one with the default
/// values and returns it. `db::PostgresStore` is the production backend;
/// `MemoryStore` backs tests and database-less runs.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;

use crate::model::BaselineReading;

/// The persistence layer could not serve a baseline.
///
/// Surfaced to HTTP callers as a generic server error; the simulation
/// engine is never invoked when this occurs.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] postgres::Error),
    #[error("Missing schema: {0}")]
    MissingSchema(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub trait BaselineStore: Send {
    /// Returns the baseline for `location`, if one exists.
    fn find(&mut self, location: &str) -> Result<Option<BaselineReading>, StoreError>;

    /// Inserts `baseline` unless its location already has one.
    /// Returns `true` if a row was written.
    fn insert_if_absent(&mut self, baseline: &BaselineReading) -> Result<bool, StoreError>;

    /// Returns the baseline for `location`, creating it with the default
    /// values (stamped `now`) if absent.
    fn fetch_or_create(
        &mut self,
        location: &str,
        now: DateTime<Utc>,
    ) -> Result<BaselineReading, StoreError> {
        if let Some(existing) = self.find(location)? {
            return Ok(existing);
        }
        self.insert_if_absent(&BaselineReading::with_defaults(location, now))?;
        // Re-read so a concurrent creator's row wins over our defaults.
        self.find(location)?.ok_or_else(|| {
            StoreError::Unavailable(format!("baseline for {location} vanished after insert"))
        })
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStore {
    baselines: HashMap<String, BaselineReading>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BaselineStore for MemoryStore {
    fn find(&mut self, location: &str) -> Result<Option<BaselineReading>, StoreError> {
        Ok(self.baselines.get(location).cloned())
    }

    fn insert_if_absent(&mut self, baseline: &BaselineReading) -> Result<bool, StoreError> {
        if self.baselines.contains_key(&baseline.location) {
            return Ok(false);
        }
        self.baselines.insert(baseline.location.clone(), baseline.clone());
        Ok(true)
    }
}
