//! Per-day itinerary text
//!
//! The language model writes the plan; when it cannot, a deterministic
//! sentence built from the destination and attractions takes its place, so
//! plan text never blocks the response.

use std::sync::Arc;

use tracing::{info, warn};

use crate::llm::LanguageModel;
use crate::models::Attractions;

/// Prompt asking for a short plan covering one day
#[must_use]
pub fn build_prompt(destination: &str, day: u32, weather: &str, attractions: &Attractions) -> String {
    format!(
        "You are a travel planner. Create a short itinerary for Day {day} in {destination}.\n\
         Weather: {weather}.\n\
         Must include these attractions if possible: {}.",
        attractions.joined()
    )
}

/// Plan used whenever the language model is unavailable
#[must_use]
pub fn fallback_plan(destination: &str, day: u32, attractions: &Attractions) -> String {
    format!(
        "Explore {destination} on Day {day}. Suggested spots: {}",
        attractions.joined()
    )
}

/// Writes the plan text for each day
pub struct ItinerarySynthesizer {
    model: Arc<dyn LanguageModel>,
}

impl ItinerarySynthesizer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Plan text for one day; never fails
    pub async fn plan_day(
        &self,
        destination: &str,
        day: u32,
        weather: &str,
        attractions: &Attractions,
    ) -> String {
        let prompt = build_prompt(destination, day, weather, attractions);

        match self.model.complete(&prompt).await {
            Ok(text) => {
                info!("Day {} plan generated ({} chars)", day, text.len());
                text.trim().to_string()
            }
            Err(e) => {
                warn!("Language model unavailable, using fallback plan for day {}: {}", day, e);
                fallback_plan(destination, day, attractions)
            }
        }
    }
}
