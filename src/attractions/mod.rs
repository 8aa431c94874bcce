//! Attraction discovery
//!
//! Two interchangeable sources produce short attraction names for a city:
//! - [`WikipediaSource`] splits the intro of the "Tourist attractions in <city>" article
//! - [`PlacesSource`] takes the top results of a places text search
//!
//! [`AttractionFinder`] puts either behind the never-empty [`Attractions`] contract.

pub mod places;
pub mod wikipedia;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::PlannerConfig;
use crate::{PlannerError, Result};
use crate::models::Attractions;

pub use places::PlacesSource;
pub use wikipedia::WikipediaSource;

/// Fragments this short (in characters) are not treated as attraction names
const MIN_FRAGMENT_CHARS: usize = 5;

/// A provider of attraction names for a city.
///
/// Implementations return `NoData` when the provider answered without
/// usable names and `Upstream` when the provider could not be used at all.
#[async_trait]
pub trait AttractionSource: Send + Sync {
    async fn discover(&self, city: &str) -> Result<Vec<String>>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Split free text into candidate attraction names.
///
/// Splits on `.`, trims each fragment, drops fragments of five characters or
/// fewer and keeps at most `max` of the rest, in order.
#[must_use]
pub fn extract_attractions(text: &str, max: usize) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|fragment| fragment.chars().count() > MIN_FRAGMENT_CHARS)
        .take(max)
        .map(str::to_string)
        .collect()
}

/// Build the source selected by `attractions.source`
pub fn source_from_config(config: &PlannerConfig) -> Result<Arc<dyn AttractionSource>> {
    let source: Arc<dyn AttractionSource> = match config.attractions.source.as_str() {
        "places" => Arc::new(PlacesSource::new(&config.maps)?),
        _ => Arc::new(WikipediaSource::new(
            &config.encyclopedia,
            config.attractions.max_results,
        )?),
    };
    Ok(source)
}

/// Attraction lookup with the sentinel fallback applied
pub struct AttractionFinder {
    source: Arc<dyn AttractionSource>,
}

impl AttractionFinder {
    pub fn new(source: Arc<dyn AttractionSource>) -> Self {
        Self { source }
    }

    /// Classified lookup, empty results surface as `NoData`
    pub async fn try_find(&self, city: &str) -> Result<Attractions> {
        let names = self.source.discover(city).await?;
        if names.is_empty() {
            return Err(PlannerError::no_data(self.source.name(), "no qualifying names"));
        }
        Ok(Attractions::new(names))
    }

    /// Never fails: any error becomes `["No attractions found"]`
    pub async fn find(&self, city: &str) -> Attractions {
        match self.try_find(city).await {
            Ok(attractions) => {
                info!(
                    "Attractions found via {}: {:?}",
                    self.source.name(),
                    attractions.as_slice()
                );
                attractions
            }
            Err(e) if e.is_no_data() => {
                warn!("No attractions for '{}' via {}: {}", city, self.source.name(), e);
                Attractions::not_found()
            }
            Err(e) => {
                warn!("Attraction source {} failed for '{}': {}", self.source.name(), city, e);
                Attractions::not_found()
            }
        }
    }
}
