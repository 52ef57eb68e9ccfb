//! JMA API types and data structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::JmaError;

/// Name reported for regions that are missing from the catalog.
pub const UNKNOWN_NAME: &str = "unknown";

/// A forecast region (JMA office) as stored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub code: String,
    pub name: String,
}

/// One cached forecast day for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub weather_code: String,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

impl ForecastRow {
    /// Weather category for this row's telegram code.
    pub fn weather_kind(&self) -> WeatherKind {
        WeatherKind::from_code(&self.weather_code)
    }
}

/// Forecast data served for a selected region.
#[derive(Debug, Clone)]
pub struct RegionForecast {
    pub region_code: String,
    pub region_name: String,
    /// False when the remote fetch failed and only cached rows are served.
    pub refreshed: bool,
    pub rows: Vec<ForecastRow>,
}

/// A group of regions under one JMA center, for sidebar-style display.
#[derive(Debug, Clone)]
pub struct RegionGroup {
    pub code: String,
    pub name: String,
    pub regions: Vec<Region>,
}

/// Weather categories mapped from JMA forecast telegram codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    Sunny,
    PartlyCloudy,
    OccasionalShowers,
    Cloudy,
    Rain,
    Snow,
    #[default]
    Unknown,
}

impl WeatherKind {
    /// Map a JMA telegram weather code to a category.
    pub fn from_code(code: &str) -> Self {
        match code {
            "100" => Self::Sunny,
            "101" => Self::PartlyCloudy,
            "103" => Self::OccasionalShowers,
            "200" => Self::Cloudy,
            "300" => Self::Rain,
            "400" => Self::Snow,
            _ => Self::Unknown,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::OccasionalShowers => "Occasional Showers",
            Self::Cloudy => "Cloudy",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Unknown => "Unknown",
        }
    }

    /// Get icon name (Phosphor icon unicode lives in the display layer)
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Sunny => "sun",
            Self::PartlyCloudy => "cloud_sun",
            Self::OccasionalShowers => "cloud_rain",
            Self::Cloudy => "cloud",
            Self::Rain => "cloud_rain",
            Self::Snow => "cloud_snow",
            Self::Unknown => "question",
        }
    }
}

/// JMA area catalog (`area.json`) response structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AreaCatalog {
    #[serde(default)]
    pub centers: BTreeMap<String, AreaInfo>,
    #[serde(default)]
    pub offices: BTreeMap<String, AreaInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaInfo {
    pub name: Option<String>,
    pub en_name: Option<String>,
    pub parent: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
}

impl AreaCatalog {
    /// Group offices under their centers for display.
    ///
    /// Office codes without a catalog entry keep the unknown sentinel as
    /// their name.
    pub fn groups(&self) -> Vec<RegionGroup> {
        self.centers
            .iter()
            .map(|(code, center)| RegionGroup {
                code: code.clone(),
                name: center
                    .name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                regions: center
                    .children
                    .iter()
                    .map(|child| Region {
                        code: child.clone(),
                        name: self
                            .offices
                            .get(child)
                            .and_then(|office| office.name.clone())
                            .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// One document of the two-element JMA forecast response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDocument {
    pub publishing_office: Option<String>,
    pub report_datetime: Option<String>,
    #[serde(default)]
    pub time_series: Vec<TimeSeriesBlock>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesBlock {
    #[serde(default)]
    pub time_defines: Vec<String>,
    #[serde(default)]
    pub areas: Vec<AreaSeries>,
}

/// Per-area parallel arrays inside a time-series block.
///
/// Temperatures arrive as numbers or numeric strings depending on the feed,
/// with empty strings for values the agency has not published.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSeries {
    pub area: Option<AreaRef>,
    #[serde(default)]
    pub weather_codes: Vec<String>,
    #[serde(default)]
    pub temps_min: Vec<serde_json::Value>,
    #[serde(default)]
    pub temps_max: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaRef {
    pub name: Option<String>,
    pub code: Option<String>,
}

/// Parallel-array forecast data extracted from a forecast response.
///
/// `dates` comes from the weekly weather block's time defines; the code and
/// temperature arrays keep their raw lengths, so consumers index them by
/// date position and treat missing entries as absent values.
#[derive(Debug, Clone, Default)]
pub struct ForecastSeries {
    pub dates: Vec<NaiveDate>,
    pub weather_codes: Vec<String>,
    pub temps_min: Vec<Option<f64>>,
    pub temps_max: Vec<Option<f64>>,
}

impl ForecastSeries {
    /// Extract the displayable series from a forecast response.
    ///
    /// The response must carry at least two documents, each with a time
    /// series. The second document holds the weekly data: block 0 has the
    /// date definitions and weather codes, block 1 the temperature arrays.
    /// Area index 0 is read in both blocks.
    pub fn from_documents(documents: &[ForecastDocument]) -> Result<Self, JmaError> {
        if documents.len() < 2 {
            return Err(JmaError::MalformedPayload(format!(
                "expected at least 2 forecast documents, got {}",
                documents.len()
            )));
        }
        if documents[0].time_series.is_empty() {
            return Err(JmaError::MalformedPayload(
                "first forecast document has no time series".to_string(),
            ));
        }

        let weekly = &documents[1];
        let weather_block = weekly.time_series.first().ok_or_else(|| {
            JmaError::MalformedPayload("weekly document has no weather block".to_string())
        })?;
        let temp_block = weekly.time_series.get(1).ok_or_else(|| {
            JmaError::MalformedPayload("weekly document has no temperature block".to_string())
        })?;

        let weather_area = weather_block
            .areas
            .first()
            .ok_or_else(|| JmaError::MalformedPayload("weather block has no areas".to_string()))?;
        let temp_area = temp_block.areas.first().ok_or_else(|| {
            JmaError::MalformedPayload("temperature block has no areas".to_string())
        })?;

        let dates = weather_block
            .time_defines
            .iter()
            .map(|time_define| {
                parse_forecast_date(time_define).ok_or_else(|| {
                    JmaError::MalformedPayload(format!(
                        "unparseable forecast date: {}",
                        time_define
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            dates,
            weather_codes: weather_area.weather_codes.clone(),
            temps_min: temp_area.temps_min.iter().map(temp_value).collect(),
            temps_max: temp_area.temps_max.iter().map(temp_value).collect(),
        })
    }
}

/// Parse the date part of an ISO time define ("2024-01-01T00:00:00+09:00").
fn parse_forecast_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Decode one temperature entry, tolerating numeric strings and blanks.
fn temp_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
