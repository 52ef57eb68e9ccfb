//! Cache-through orchestration between the JMA client and the forecast store.
//!
//! Reads are always served from the store: a fetch that succeeds is written
//! back first, and a fetch that fails leaves the cache untouched.

use parking_lot::Mutex;
use tracing::instrument;

use crate::client::JmaClient;
use crate::error::JmaError;
use crate::store::ForecastStore;
use crate::types::{ForecastSeries, Region, RegionForecast, RegionGroup};

/// Orchestrates fetch, storage, and read-back of forecast data.
///
/// Store access is serialized behind a mutex; fetches run outside it, so a
/// concurrent selection can never observe a half-written region.
pub struct ForecastService {
    client: JmaClient,
    store: Mutex<ForecastStore>,
}

impl ForecastService {
    pub fn new(client: JmaClient, store: ForecastStore) -> Self {
        Self {
            client,
            store: Mutex::new(store),
        }
    }

    /// Sync the region catalog and return the grouped hierarchy for display.
    ///
    /// Remote failures propagate; callers may fall back to
    /// [`cached_regions`](Self::cached_regions).
    #[instrument(skip(self), level = "info")]
    pub async fn sync_catalog(&self) -> Result<Vec<RegionGroup>, JmaError> {
        let catalog = self.client.fetch_area_catalog().await?;
        {
            let store = self.store.lock();
            store.upsert_regions(&catalog)?;
        }
        Ok(catalog.groups())
    }

    /// Fetch the latest forecast for a region, then serve rows from the store.
    ///
    /// A remote failure or malformed payload degrades to cached rows with
    /// `refreshed` set to false; storage faults propagate.
    #[instrument(skip(self), level = "info")]
    pub async fn select_region(&self, region_code: &str) -> Result<RegionForecast, JmaError> {
        let series = match self.client.fetch_forecast(region_code).await {
            Ok(documents) => match ForecastSeries::from_documents(&documents) {
                Ok(series) => Some(series),
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(
                        region_code,
                        error = %e,
                        "Forecast payload rejected, serving cached data"
                    );
                    None
                }
                Err(e) => return Err(e),
            },
            Err(e) if e.is_recoverable() => {
                tracing::warn!(
                    region_code,
                    error = %e,
                    "Forecast fetch failed, serving cached data"
                );
                None
            }
            Err(e) => return Err(e),
        };

        let refreshed = series.is_some();
        let store = self.store.lock();
        if let Some(series) = series {
            store.upsert_forecasts(region_code, &series)?;
        }
        let region_name = store.get_region_name(region_code)?;
        let rows = store.get_forecasts(region_code)?;

        Ok(RegionForecast {
            region_code: region_code.to_string(),
            region_name,
            refreshed,
            rows,
        })
    }

    /// Regions already present in the store (for offline startup).
    pub fn cached_regions(&self) -> Result<Vec<Region>, JmaError> {
        self.store.lock().list_regions()
    }
}
