/// PostgreSQL baseline store.
///
/// One row per location in `water_data`; `location` is the primary key so
/// the one-baseline-per-location invariant holds even with several service
/// instances creating defaults at once (`ON CONFLICT DO NOTHING`).
///
/// Uses the blocking `postgres` client. Callers on an async runtime must
/// run store calls on a blocking thread (see `server.rs`).

use postgres::{Client, NoTls, Row};

use crate::model::BaselineReading;
use crate::store::{BaselineStore, StoreError};

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS water_data (
        location        TEXT PRIMARY KEY,
        fecal_coliform  DOUBLE PRECISION NOT NULL,
        flow            DOUBLE PRECISION NOT NULL,
        nitrate         DOUBLE PRECISION NOT NULL,
        rainfall        DOUBLE PRECISION NOT NULL,
        temperature     DOUBLE PRECISION NOT NULL,
        water_level     DOUBLE PRECISION NOT NULL,
        bod             DOUBLE PRECISION NOT NULL,
        last_updated    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
";

const SELECT_BASELINE: &str = "
    SELECT location, fecal_coliform, flow, nitrate, rainfall,
           temperature, water_level, bod, last_updated
    FROM water_data
    WHERE location = $1
";

const INSERT_BASELINE: &str = "
    INSERT INTO water_data
        (location, fecal_coliform, flow, nitrate, rainfall,
         temperature, water_level, bod, last_updated)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    ON CONFLICT (location) DO NOTHING
";

pub struct PostgresStore {
    client: Client,
}

impl PostgresStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates `water_data` if it does not exist yet.
    pub fn ensure_schema(&mut self) -> Result<(), StoreError> {
        self.client.batch_execute(CREATE_TABLE)?;
        Ok(())
    }

    /// Confirms the `water_data` table is present.
    pub fn verify_schema(&mut self) -> Result<(), StoreError> {
        let row = self.client.query_one(
            "SELECT EXISTS (
                 SELECT 1 FROM information_schema.tables
                 WHERE table_name = 'water_data'
             )",
            &[],
        )?;
        if row.get::<_, bool>(0) {
            Ok(())
        } else {
            Err(StoreError::MissingSchema("table water_data not found".to_string()))
        }
    }
}

/// Connects to `database_url`, creates the schema if needed and verifies it.
pub fn connect_and_verify(database_url: &str) -> Result<PostgresStore, StoreError> {
    let client = Client::connect(database_url, NoTls)?;
    let mut store = PostgresStore::new(client);
    store.ensure_schema()?;
    store.verify_schema()?;
    Ok(store)
}

fn baseline_from_row(row: &Row) -> BaselineReading {
    BaselineReading {
        location: row.get(0),
        fecal_coliform: row.get(1),
        flow: row.get(2),
        nitrate: row.get(3),
        rainfall: row.get(4),
        temperature: row.get(5),
        water_level: row.get(6),
        bod: row.get(7),
        last_updated: row.get(8),
    }
}

impl BaselineStore for PostgresStore {
    fn find(&mut self, location: &str) -> Result<Option<BaselineReading>, StoreError> {
        let row = self.client.query_opt(SELECT_BASELINE, &[&location])?;
        Ok(row.as_ref().map(baseline_from_row))
    }

    fn insert_if_absent(&mut self, baseline: &BaselineReading) -> Result<bool, StoreError> {
        let written = self.client.execute(
            INSERT_BASELINE,
            &[
                &baseline.location,
                &baseline.fecal_coliform,
                &baseline.flow,
                &baseline.nitrate,
                &baseline.rainfall,
                &baseline.temperature,
                &baseline.water_level,
                &baseline.bod,
                &baseline.last_updated,
            ],
        )?;
        Ok(written == 1)
    }
}
