//! Itinerary assembly
//!
//! Weather, flights and attractions are looked up once, in that order, and
//! shared by every day; only the plan text is produced per day.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use crate::Result;
use crate::attractions::{self, AttractionFinder};
use crate::config::PlannerConfig;
use crate::flights::{AmadeusClient, FlightPricing};
use crate::llm::ChatCompletionClient;
use crate::models::{DayPlan, ItineraryRequest};
use crate::synthesis::ItinerarySynthesizer;
use crate::weather::{OpenWeatherClient, WeatherProvider};

/// Builds a day-by-day itinerary from the external lookups
pub struct ItineraryPlanner {
    weather: Arc<dyn WeatherProvider>,
    flights: FlightPricing,
    attractions: AttractionFinder,
    synthesizer: ItinerarySynthesizer,
}

impl ItineraryPlanner {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        flights: FlightPricing,
        attractions: AttractionFinder,
        synthesizer: ItinerarySynthesizer,
    ) -> Self {
        Self {
            weather,
            flights,
            attractions,
            synthesizer,
        }
    }

    /// Wire the production clients from configuration
    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        let weather = Arc::new(OpenWeatherClient::new(&config.weather)?);
        let flights = FlightPricing::new(Arc::new(AmadeusClient::new(&config.flights)?), &config.flights);
        let attractions = AttractionFinder::new(attractions::source_from_config(config)?);
        let synthesizer = ItinerarySynthesizer::new(Arc::new(ChatCompletionClient::new(&config.llm)));

        Ok(Self::new(weather, flights, attractions, synthesizer))
    }

    /// Produce one [`DayPlan`] per requested day.
    ///
    /// Weather and flight provider failures abort the whole itinerary;
    /// attraction and plan-text failures are absorbed by their fallbacks.
    #[instrument(skip(self, request), fields(destination = %request.destination, days = request.days))]
    pub async fn plan(&self, request: &ItineraryRequest) -> Result<Vec<DayPlan>> {
        let start_time = Instant::now();
        let destination = request.destination.as_str();

        let weather = self.weather.current(destination).await?.summary();
        info!("Weather information: {}", weather);

        let flights = self.flights.quote(destination).await?.to_string();
        info!("Flight information: {}", flights);

        let attractions = self.attractions.find(destination).await;

        let mut itinerary = Vec::with_capacity(request.days as usize);
        for day in 1..=request.days {
            let plan = self
                .synthesizer
                .plan_day(destination, day, &weather, &attractions)
                .await;

            itinerary.push(DayPlan {
                day,
                plan,
                weather: weather.clone(),
                flights: flights.clone(),
                attractions: attractions.as_slice().to_vec(),
            });
        }

        info!(
            "Built {}-day itinerary for '{}' in {:.3}s",
            itinerary.len(),
            destination,
            start_time.elapsed().as_secs_f64()
        );
        Ok(itinerary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attractions::AttractionSource;
    use crate::config::FlightsConfig;
    use crate::flights::{FlightProvider, OfferQuery};
    use crate::llm::LanguageModel;
    use crate::models::{NO_AIRPORT, WeatherReport};
    use crate::PlannerError;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    /// Records the order in which providers are consulted
    #[derive(Default)]
    struct CallLog(Mutex<Vec<&'static str>>);

    impl CallLog {
        fn push(&self, name: &'static str) {
            self.0.lock().unwrap().push(name);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.0.lock().unwrap().clone()
        }
    }

    struct Weather(Arc<CallLog>, bool);

    #[async_trait]
    impl WeatherProvider for Weather {
        async fn current(&self, _city: &str) -> Result<WeatherReport> {
            self.0.push("weather");
            if self.1 {
                return Err(PlannerError::upstream("weather", "connection reset"));
            }
            Ok(WeatherReport {
                temperature: Some(serde_json::Number::from(31u32)),
                description: Some("haze".to_string()),
            })
        }
    }

    struct Flights(Arc<CallLog>);

    #[async_trait]
    impl FlightProvider for Flights {
        async fn access_token(&self) -> Result<String> {
            self.0.push("token");
            Ok("t".to_string())
        }

        async fn search_offers(&self, _token: &str, _query: &OfferQuery) -> Result<Value> {
            self.0.push("offers");
            Ok(json!({"data": [{"price": {"total": "5000.00"}, "validatingAirlineCodes": ["AI"]}]}))
        }

        async fn locate_city(&self, _token: &str, _city: &str) -> Result<Option<String>> {
            Ok(None)
        }
    }

    struct Sights(Arc<CallLog>);

    #[async_trait]
    impl AttractionSource for Sights {
        async fn discover(&self, _city: &str) -> Result<Vec<String>> {
            self.0.push("attractions");
            Ok(vec!["Gateway of India".to_string()])
        }

        fn name(&self) -> &'static str {
            "sights"
        }
    }

    struct Model(Arc<CallLog>);

    #[async_trait]
    impl LanguageModel for Model {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.0.push("plan");
            Ok("A day by the sea.".to_string())
        }
    }

    fn planner(log: &Arc<CallLog>, weather_down: bool) -> ItineraryPlanner {
        ItineraryPlanner::new(
            Arc::new(Weather(log.clone(), weather_down)),
            FlightPricing::new(Arc::new(Flights(log.clone())), &FlightsConfig::default()),
            AttractionFinder::new(Arc::new(Sights(log.clone()))),
            ItinerarySynthesizer::new(Arc::new(Model(log.clone()))),
        )
    }

    fn request(destination: &str, days: u32) -> ItineraryRequest {
        ItineraryRequest {
            destination: destination.to_string(),
            days,
        }
    }

    #[tokio::test]
    async fn test_lookups_run_once_in_order() {
        let log = Arc::new(CallLog::default());
        let itinerary = planner(&log, false).plan(&request("Mumbai", 3)).await.unwrap();

        assert_eq!(itinerary.len(), 3);
        assert_eq!(
            log.calls(),
            vec!["weather", "token", "offers", "attractions", "plan", "plan", "plan"]
        );
    }

    #[tokio::test]
    async fn test_days_share_lookups() {
        let log = Arc::new(CallLog::default());
        let itinerary = planner(&log, false).plan(&request("Mumbai", 2)).await.unwrap();

        for (index, day) in itinerary.iter().enumerate() {
            assert_eq!(day.day as usize, index + 1);
            assert_eq!(day.weather, "31°C, haze");
            assert_eq!(day.flights, "Cheapest flight ~₹5000.00 via AI");
            assert_eq!(day.attractions, vec!["Gateway of India"]);
            assert_eq!(day.plan, "A day by the sea.");
        }
    }

    #[tokio::test]
    async fn test_unmapped_city_makes_no_flight_calls() {
        let log = Arc::new(CallLog::default());
        let itinerary = planner(&log, false).plan(&request("Atlantis", 1)).await.unwrap();

        assert_eq!(itinerary[0].flights, NO_AIRPORT);
        assert!(!log.calls().contains(&"token"));
        assert!(!log.calls().contains(&"offers"));
    }

    #[tokio::test]
    async fn test_weather_failure_aborts() {
        let log = Arc::new(CallLog::default());
        let err = planner(&log, true).plan(&request("Mumbai", 2)).await.unwrap_err();

        assert!(err.is_upstream());
        assert_eq!(log.calls(), vec!["weather"]);
    }
}
