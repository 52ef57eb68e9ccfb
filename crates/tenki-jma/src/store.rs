//! SQLite-backed store for cached regions and forecasts.

use rusqlite::{params, Connection};
use std::path::Path;

use crate::error::JmaError;
use crate::types::{AreaCatalog, ForecastRow, ForecastSeries, Region, UNKNOWN_NAME};

/// SQLite store holding the region catalog and forecast rows.
pub struct ForecastStore {
    conn: Connection,
}

impl ForecastStore {
    /// Open (or create) the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, JmaError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, JmaError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<(), JmaError> {
        self.conn.execute_batch(
            r#"
            -- The bundled SQLite is compiled with SQLITE_DEFAULT_FOREIGN_KEYS=1;
            -- the schema's FOREIGN KEY is declared but must not be enforced
            -- (forecasts may be written before their region exists).
            PRAGMA foreign_keys = OFF;

            CREATE TABLE IF NOT EXISTS regions (
                region_code TEXT PRIMARY KEY,
                region_name TEXT
            );

            CREATE TABLE IF NOT EXISTS forecasts (
                region_code TEXT,
                forecast_date TEXT,
                weather_code TEXT,
                min_temp REAL,
                max_temp REAL,
                PRIMARY KEY (region_code, forecast_date),
                FOREIGN KEY (region_code) REFERENCES regions (region_code)
            );
            "#,
        )?;
        Ok(())
    }

    /// Store catalog offices, keeping the first-seen name for known codes.
    ///
    /// Returns the number of newly inserted regions.
    pub fn upsert_regions(&self, catalog: &AreaCatalog) -> Result<usize, JmaError> {
        let mut inserted = 0;
        for (code, office) in &catalog.offices {
            let name = office.name.as_deref().unwrap_or(UNKNOWN_NAME);
            inserted += self.conn.execute(
                "INSERT OR IGNORE INTO regions (region_code, region_name) VALUES (?1, ?2)",
                params![code, name],
            )?;
        }
        tracing::debug!(total = catalog.offices.len(), inserted, "Stored region catalog");
        Ok(inserted)
    }

    /// Upsert forecast rows for a region, one per date index.
    ///
    /// Temperature arrays shorter than the date array yield NULL temps; a
    /// weather code missing at an index is stored as an empty string.
    /// Returns the number of rows written.
    pub fn upsert_forecasts(
        &self,
        region_code: &str,
        series: &ForecastSeries,
    ) -> Result<usize, JmaError> {
        let mut written = 0;
        for (i, date) in series.dates.iter().enumerate() {
            let weather_code = series.weather_codes.get(i).cloned().unwrap_or_default();
            let min_temp = series.temps_min.get(i).copied().flatten();
            let max_temp = series.temps_max.get(i).copied().flatten();

            written += self.conn.execute(
                r#"
                INSERT OR REPLACE INTO forecasts
                (region_code, forecast_date, weather_code, min_temp, max_temp)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![region_code, date, weather_code, min_temp, max_temp],
            )?;
        }
        tracing::debug!(region_code, written, "Stored forecast rows");
        Ok(written)
    }

    /// Get a region's display name, or the unknown sentinel when absent.
    pub fn get_region_name(&self, region_code: &str) -> Result<String, JmaError> {
        let result: rusqlite::Result<Option<String>> = self.conn.query_row(
            "SELECT region_name FROM regions WHERE region_code = ?1",
            params![region_code],
            |row| row.get(0),
        );
        match result {
            Ok(Some(name)) => Ok(name),
            Ok(None) => Ok(UNKNOWN_NAME.to_string()),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(UNKNOWN_NAME.to_string()),
            Err(e) => Err(e.into()),
        }
    }

    /// Cached forecast rows for a region, ascending by date.
    pub fn get_forecasts(&self, region_code: &str) -> Result<Vec<ForecastRow>, JmaError> {
        let mut stmt = self.conn.prepare(
            "SELECT forecast_date, weather_code, min_temp, max_temp
             FROM forecasts
             WHERE region_code = ?1
             ORDER BY forecast_date",
        )?;

        let rows = stmt.query_map(params![region_code], Self::row_to_forecast)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// All cached regions, ordered by code.
    pub fn list_regions(&self) -> Result<Vec<Region>, JmaError> {
        let mut stmt = self
            .conn
            .prepare("SELECT region_code, region_name FROM regions ORDER BY region_code")?;

        let rows = stmt.query_map([], |row| {
            Ok(Region {
                code: row.get(0)?,
                name: row
                    .get::<_, Option<String>>(1)?
                    .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn row_to_forecast(row: &rusqlite::Row) -> rusqlite::Result<ForecastRow> {
        Ok(ForecastRow {
            date: row.get(0)?,
            weather_code: row.get(1)?,
            min_temp: row.get(2)?,
            max_temp: row.get(3)?,
        })
    }
}
