//! OpenWeatherMap daily forecast client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode, Url};
use stormdeck_core::{Units, WeatherConfig};
use tracing::instrument;

use crate::types::{ForecastResponse, SelectedCity, StampedForecast, WeatherError};

const FORECAST_PATH: &str = "forecast/daily";
const ERROR_BODY_LIMIT: usize = 200;

/// Anything that can produce a stamped forecast for a city.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch(&self, city: &SelectedCity) -> Result<StampedForecast, WeatherError>;
}

#[derive(Debug, Clone)]
pub struct ForecastProvider {
    client: Arc<Client>,
    base_url: String,
    app_id: String,
    units: Units,
    days: u8,
}

impl ForecastProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let mut builder = Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }
        let client = builder.build()?;

        if config.effective_app_id().is_empty() {
            tracing::warn!("No OpenWeatherMap app id configured; requests will be rejected");
        }

        Ok(Self {
            client: Arc::new(client),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            app_id: config.effective_app_id(),
            units: config.units,
            days: config.days,
        })
    }

    /// `{base}/forecast/daily?id=..&units=..&appid=..&cnt=..`
    pub fn forecast_url(&self, key: &str) -> Result<Url, WeatherError> {
        let endpoint = format!("{}/{}", self.base_url, FORECAST_PATH);
        let days = self.days.to_string();
        Url::parse_with_params(
            &endpoint,
            &[
                ("id", key),
                ("units", self.units.as_query_value()),
                ("appid", self.app_id.as_str()),
                ("cnt", days.as_str()),
            ],
        )
        .map_err(|e| WeatherError::InvalidRequest(format!("{}: {}", endpoint, e)))
    }

    /// Fetch the forecast for one city and stamp it with the receive time.
    ///
    /// Only HTTP 200 counts as success.
    #[instrument(skip(self, city), fields(key = %city.key), level = "info")]
    pub async fn fetch(&self, city: &SelectedCity) -> Result<StampedForecast, WeatherError> {
        let url = self.forecast_url(&city.key)?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            tracing::debug!("Forecast request returned status {}", status);
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        tracing::debug!(
            city_id = parsed.city.id,
            days = parsed.list.len(),
            "Forecast received"
        );
        Ok(StampedForecast::new(city, Utc::now(), parsed))
    }
}

#[async_trait]
impl ForecastSource for ForecastProvider {
    async fn fetch(&self, city: &SelectedCity) -> Result<StampedForecast, WeatherError> {
        ForecastProvider::fetch(self, city).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> ForecastProvider {
        let config = WeatherConfig {
            app_id: "secret".to_string(),
            api_base_url: "http://api.example.com/data/2.5/".to_string(),
            ..WeatherConfig::default()
        };
        ForecastProvider::new(&config).unwrap()
    }

    #[test]
    fn test_forecast_url_has_all_parameters() {
        let url = provider().forecast_url("5128638").unwrap();

        assert_eq!(url.path(), "/data/2.5/forecast/daily");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("id".to_string(), "5128638".to_string()),
                ("units".to_string(), "imperial".to_string()),
                ("appid".to_string(), "secret".to_string()),
                ("cnt".to_string(), "8".to_string()),
            ]
        );
    }

    #[test]
    fn test_forecast_url_escapes_key() {
        let url = provider().forecast_url("a&b").unwrap();
        assert!(url.as_str().contains("id=a%26b"));
    }
}
