//! HTTP client for the JMA bosai endpoints.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

use crate::error::JmaError;
use crate::types::{AreaCatalog, ForecastDocument};

const JMA_API_BASE: &str = "https://www.jma.go.jp/bosai";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Endpoint settings for the JMA client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JmaConfig {
    /// Base URL for the bosai API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    JMA_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for JmaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

pub struct JmaClient {
    client: reqwest::Client,
    base_url: String,
}

impl JmaClient {
    pub fn new(config: &JmaConfig) -> Result<Self, JmaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the nationwide area catalog.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_area_catalog(&self) -> Result<AreaCatalog, JmaError> {
        let url = format!("{}/common/const/area.json", self.base_url);
        tracing::debug!(%url, "Fetching area catalog");

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Fetch the forecast documents for a region office code.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(
        &self,
        region_code: &str,
    ) -> Result<Vec<ForecastDocument>, JmaError> {
        let url = format!(
            "{}/forecast/data/forecast/{}.json",
            self.base_url, region_code
        );
        tracing::debug!(%url, "Fetching forecast");

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, JmaError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| JmaError::MalformedPayload(format!("JSON parse error: {}", e)))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(JmaError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> JmaClient {
        let config = JmaConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        };
        JmaClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_area_catalog() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/common/const/area.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "centers": {
                    "010300": {"name": "Kanto", "children": ["130000"]}
                },
                "offices": {
                    "130000": {"name": "Tokyo", "parent": "010300"}
                }
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let catalog = client.fetch_area_catalog().await.unwrap();

        assert_eq!(catalog.offices.len(), 1);
        assert_eq!(catalog.offices["130000"].name.as_deref(), Some("Tokyo"));
    }

    #[tokio::test]
    async fn test_fetch_forecast() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/data/forecast/130000.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"timeSeries": [{"timeDefines": ["2024-01-01T11:00:00"], "areas": [{"weatherCodes": ["100"]}]}]},
                {"timeSeries": [
                    {"timeDefines": ["2024-01-01T00:00:00"], "areas": [{"weatherCodes": ["100"]}]},
                    {"timeDefines": ["2024-01-01T00:00:00"], "areas": [{"tempsMin": ["5"], "tempsMax": ["10"]}]}
                ]}
            ])))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let documents = client.fetch_forecast("130000").await.unwrap();

        assert_eq!(documents.len(), 2);
        assert_eq!(
            documents[1].time_series[0].areas[0].weather_codes,
            vec!["100"]
        );
    }

    #[tokio::test]
    async fn test_not_found_is_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/data/forecast/999999.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let result = client.fetch_forecast("999999").await;

        assert!(matches!(result, Err(JmaError::Api { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_server_error_is_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/common/const/area.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let result = client.fetch_area_catalog().await;

        assert!(matches!(result, Err(JmaError::Api { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_malformed_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/data/forecast/130000.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let result = client.fetch_forecast("130000").await;

        assert!(matches!(result, Err(JmaError::MalformedPayload(_))));
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/common/const/area.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "centers": {},
                "offices": {}
            })))
            .mount(&mock_server)
            .await;

        let config = JmaConfig {
            base_url: format!("{}/", mock_server.uri()),
            timeout_secs: 5,
        };
        let client = JmaClient::new(&config).unwrap();

        assert!(client.fetch_area_catalog().await.is_ok());
    }
}
