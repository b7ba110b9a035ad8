//! CWA open-data API client.
//!
//! Handlers depend on the `ForecastSource` trait rather than on `CwaClient`
//! directly, so routes can be exercised without network access.

use crate::city::City;
use crate::config::UpstreamConfig;
use crate::error::{ForecastError, ForecastResult};
use crate::forecast::{build_city_forecast, Alignment, CityForecast, DatasetResponse};
use std::future::Future;
use std::time::Duration;

/// 36-hour general forecast dataset, one record per county or city.
pub const DATASET_ID: &str = "F-C0032-001";

/// Anything that can produce a city's forecast.
pub trait ForecastSource: Send + Sync + 'static {
    fn fetch_forecast(
        &self,
        city: City,
    ) -> impl Future<Output = ForecastResult<CityForecast>> + Send;
}

/// Client for the CWA datastore API. One GET per forecast, no retries.
#[derive(Debug, Clone)]
pub struct CwaClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    alignment: Alignment,
}

impl CwaClient {
    /// Create a client from upstream configuration.
    ///
    /// A missing API key is not an error here; it is reported per request.
    pub fn new(config: &UpstreamConfig) -> ForecastResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
            alignment: config.alignment,
        })
    }

    /// Full dataset URL.
    pub fn dataset_url(&self) -> String {
        format!("{}/v1/rest/datastore/{}", self.base_url, DATASET_ID)
    }

    /// Whether requests can be authorized.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch the dataset for `city` and reshape it.
    pub async fn fetch(&self, city: City) -> ForecastResult<CityForecast> {
        let api_key = self.api_key.as_deref().ok_or(ForecastError::MissingApiKey)?;

        let resp = self
            .client
            .get(self.dataset_url())
            .query(&[
                ("Authorization", api_key),
                ("locationName", city.location_name()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!("CWA API returned {} for {}", status, city);
            // Keep the status even if the error body cannot be read
            let body = resp.bytes().await.unwrap_or_default();
            return Err(ForecastError::upstream(status.as_u16(), &body));
        }

        let body = resp.bytes().await?;
        let dataset: DatasetResponse = serde_json::from_slice(&body)?;
        build_city_forecast(dataset, city, self.alignment)
    }
}

impl ForecastSource for CwaClient {
    async fn fetch_forecast(&self, city: City) -> ForecastResult<CityForecast> {
        self.fetch(city).await
    }
}

// ── Mock source for testing ─────────────────────────────────────────
