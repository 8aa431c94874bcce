//! Wikipedia-backed attraction source
//!
//! Queries the MediaWiki API for the intro of "Tourist attractions in <city>",
//! following redirects, and splits the plain-text extract into names.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use super::{AttractionSource, extract_attractions};
use crate::config::EncyclopediaConfig;
use crate::{PlannerError, Result};

const SERVICE: &str = "encyclopedia";

/// Attraction source reading encyclopedia article intros
pub struct WikipediaSource {
    client: Client,
    base_url: String,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryResult>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    pages: BTreeMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: Option<String>,
    extract: Option<String>,
}

impl WikipediaSource {
    pub fn new(config: &EncyclopediaConfig, max_results: usize) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            max_results,
        })
    }

    fn request_url(&self, city: &str) -> String {
        let title = format!("Tourist attractions in {city}");
        format!(
            "{}?action=query&format=json&prop=extracts&exintro=1&explaintext=1&redirects=1&titles={}",
            self.base_url,
            urlencoding::encode(&title)
        )
    }

    /// Names from the first page of a query response
    fn names_from(&self, response: QueryResponse) -> Result<Vec<String>> {
        let page = response
            .query
            .and_then(|query| query.pages.into_values().next())
            .ok_or_else(|| PlannerError::no_data(SERVICE, "response holds no pages"))?;

        let title = page.title.unwrap_or_default();
        let extract = page
            .extract
            .ok_or_else(|| PlannerError::no_data(SERVICE, format!("page '{title}' has no extract")))?;

        let names = extract_attractions(&extract, self.max_results);
        if names.is_empty() {
            return Err(PlannerError::no_data(
                SERVICE,
                format!("extract of '{title}' has no usable sentences"),
            ));
        }
        Ok(names)
    }
}

#[async_trait]
impl AttractionSource for WikipediaSource {
    #[instrument(skip(self))]
    async fn discover(&self, city: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.request_url(city))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| PlannerError::upstream(SERVICE, format!("request failed: {e}")))?;

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| PlannerError::upstream(SERVICE, format!("invalid response body: {e}")))?;

        debug!("Wikipedia data received: {:?}", body);
        self.names_from(body)
    }

    fn name(&self) -> &'static str {
        "wikipedia"
    }
}
