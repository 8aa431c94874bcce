//! Weather lookup against the OpenWeather current-conditions API
//!
//! The destination is sent by name; the response is reduced to a
//! [`WeatherReport`] whose missing fields degrade to `N/A` instead of failing.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::WeatherReport;
use crate::{PlannerError, Result};

const SERVICE: &str = "weather";

/// Source of current conditions for a city
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherReport>;
}

/// Weather API client for OpenWeather
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    units: String,
}

impl OpenWeatherClient {
    /// Create a new weather API client
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("TravelPlanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            units: config.units.clone(),
        })
    }

    fn request_url(&self, city: &str) -> String {
        format!(
            "{}?q={}&appid={}&units={}",
            self.base_url,
            urlencoding::encode(city),
            urlencoding::encode(&self.api_key),
            self.units
        )
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn current(&self, city: &str) -> Result<WeatherReport> {
        info!("Fetching weather data for '{}'", city);
        let start_time = Instant::now();

        let response = self
            .client
            .get(self.request_url(city))
            .send()
            .await
            .map_err(|e| PlannerError::upstream(SERVICE, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are still JSON; the missing fields surface as N/A.
            warn!("Weather API answered HTTP {} for '{}'", status, city);
        }

        let body: openweather::CurrentResponse = response
            .json()
            .await
            .map_err(|e| PlannerError::upstream(SERVICE, format!("invalid response body: {e}")))?;

        debug!("Weather data received: {:?}", body);

        let report = body.into_report();
        info!(
            "Weather for '{}' is {} ({:.3}s)",
            city,
            report.summary(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(report)
    }
}

/// OpenWeather response structures
mod openweather {
    use super::WeatherReport;
    use serde::Deserialize;
    use serde_json::Number;

    #[derive(Debug, Default, Deserialize)]
    pub struct CurrentResponse {
        pub main: Option<MainData>,
        pub weather: Option<Vec<Condition>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainData {
        pub temp: Option<Number>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: Option<String>,
    }

    impl CurrentResponse {
        pub fn into_report(self) -> WeatherReport {
            WeatherReport {
                temperature: self.main.and_then(|main| main.temp),
                description: self
                    .weather
                    .and_then(|conditions| conditions.into_iter().next())
                    .and_then(|condition| condition.description),
            }
        }
    }
}
