//! Google Places text-search attraction source

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::AttractionSource;
use crate::config::MapsConfig;
use crate::{PlannerError, Result};

const SERVICE: &str = "places";

/// Number of place names taken from a search
const PLACES_LIMIT: usize = 3;

/// Attraction source backed by a places text search
pub struct PlacesSource {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    #[serde(default)]
    results: Vec<PlaceResult>,
    status: Option<String>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: Option<String>,
}

impl PlacesSource {
    pub fn new(config: &MapsConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("TravelPlanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        })
    }

    fn request_url(&self, city: &str) -> String {
        let query = format!("tourist attractions in {city}");
        format!(
            "{}?query={}&key={}",
            self.base_url,
            urlencoding::encode(&query),
            urlencoding::encode(&self.api_key)
        )
    }
}

fn names_from(response: TextSearchResponse) -> Result<Vec<String>> {
    let names: Vec<String> = response
        .results
        .into_iter()
        .take(PLACES_LIMIT)
        .filter_map(|place| place.name)
        .collect();

    if names.is_empty() {
        let status = response.status.unwrap_or_else(|| "UNKNOWN".to_string());
        let detail = response.error_message.unwrap_or_default();
        return Err(PlannerError::no_data(
            SERVICE,
            format!("search returned no places (status {status}) {detail}").trim_end().to_string(),
        ));
    }
    Ok(names)
}

#[async_trait]
impl AttractionSource for PlacesSource {
    #[instrument(skip(self))]
    async fn discover(&self, city: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.request_url(city))
            .send()
            .await
            .map_err(|e| PlannerError::upstream(SERVICE, format!("request failed: {e}")))?;

        if !response.status().is_success() {
            warn!("Places API answered HTTP {}", response.status());
        }

        let body: TextSearchResponse = response
            .json()
            .await
            .map_err(|e| PlannerError::upstream(SERVICE, format!("invalid response body: {e}")))?;

        debug!("Places data received: {:?}", body);
        names_from(body)
    }

    fn name(&self) -> &'static str {
        "places"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> TextSearchResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_takes_first_three_names() {
        let body = parse(
            r#"{"status":"OK","results":[{"name":"Gateway of India"},{"name":"Marine Drive"},
            {"name":"Haji Ali Dargah"},{"name":"Juhu Beach"}]}"#,
        );
        assert_eq!(
            names_from(body).unwrap(),
            vec!["Gateway of India", "Marine Drive", "Haji Ali Dargah"]
        );
    }

    #[test]
    fn test_unnamed_results_are_skipped() {
        let body = parse(r#"{"results":[{"place_id":"x"},{"name":"Elephanta Caves"}]}"#);
        assert_eq!(names_from(body).unwrap(), vec!["Elephanta Caves"]);
    }

    #[test]
    fn test_denied_request_is_no_data() {
        let body = parse(
            r#"{"results":[],"status":"REQUEST_DENIED","error_message":"The provided API key is invalid."}"#,
        );
        let err = names_from(body).unwrap_err();
        assert!(err.is_no_data());
        assert!(err.to_string().contains("REQUEST_DENIED"));
    }

    #[test]
    fn test_request_url() {
        let config = MapsConfig {
            api_key: "maps-key".to_string(),
            ..MapsConfig::default()
        };
        let url = PlacesSource::new(&config).unwrap().request_url("Goa");
        assert_eq!(
            url,
            "https://maps.googleapis.com/maps/api/place/textsearch/json?query=tourist%20attractions%20in%20Goa&key=maps-key"
        );
    }
}
