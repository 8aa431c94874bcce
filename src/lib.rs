//! `TravelPlanner` - day-by-day travel itineraries over HTTP
//!
//! This library looks up current weather, the cheapest flight and notable
//! attractions for a destination, then writes a short plan for every day
//! of the trip.

pub mod api;
pub mod attractions;
pub mod config;
pub mod error;
pub mod flights;
pub mod llm;
pub mod logging;
pub mod models;
pub mod planner;
pub mod synthesis;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use attractions::{AttractionFinder, AttractionSource};
pub use config::PlannerConfig;
pub use error::PlannerError;
pub use flights::{FlightPricing, FlightProvider};
pub use llm::LanguageModel;
pub use models::{Attractions, DayPlan, FlightQuote, ItineraryRequest, WeatherReport};
pub use planner::ItineraryPlanner;
pub use synthesis::ItinerarySynthesizer;
pub use weather::WeatherProvider;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;
