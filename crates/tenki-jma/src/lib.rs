//! JMA weather integration for Tenki.
//!
//! Provides the forecast API client, SQLite-backed offline store, and the
//! cache-through sync service.

pub mod client;
pub mod error;
pub mod store;
pub mod sync;
pub mod types;

pub use client::{JmaClient, JmaConfig};
pub use error::JmaError;
pub use store::ForecastStore;
pub use sync::ForecastService;
pub use types::{
    AreaCatalog, ForecastRow, ForecastSeries, Region, RegionForecast, RegionGroup, WeatherKind,
    UNKNOWN_NAME,
};
