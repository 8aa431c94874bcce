//! Data models for itinerary requests and responses
//!
//! All values are request-scoped: they are computed from scratch for every
//! call and dropped once the response is written.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// Flights field when the destination is missing from the airport table
pub const NO_AIRPORT: &str = "No airport found for this city";
/// Flights field when the provider answered without a usable offer
pub const NO_FLIGHT_DATA: &str = "No flight data available";
/// Single attraction entry used when discovery yields nothing
pub const NO_ATTRACTIONS: &str = "No attractions found";
/// Placeholder for weather fields absent from the provider response
pub const NOT_AVAILABLE: &str = "N/A";

/// A validated itinerary request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryRequest {
    /// Destination city, trimmed
    pub destination: String,
    /// Number of days, at least 1
    pub days: u32,
}

/// Current conditions at the destination
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherReport {
    /// Temperature in the configured unit system, as written by the provider
    pub temperature: Option<Number>,
    pub description: Option<String>,
}

impl WeatherReport {
    /// Human-readable `"<temp>°C, <description>"` line, missing parts become `N/A`
    #[must_use]
    pub fn summary(&self) -> String {
        let temperature = self
            .temperature
            .as_ref()
            .map_or_else(|| NOT_AVAILABLE.to_string(), Number::to_string);
        let description = self.description.as_deref().unwrap_or(NOT_AVAILABLE);
        format!("{temperature}°C, {description}")
    }
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Outcome of a flight price lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightQuote {
    /// Cheapest offer found by the provider
    Offer { price: String, airline: String },
    /// Destination has no known airport, the provider was not called
    NoAirport,
    /// Provider answered without a usable offer
    Unavailable,
}

impl fmt::Display for FlightQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightQuote::Offer { price, airline } => {
                write!(f, "Cheapest flight ~₹{price} via {airline}")
            }
            FlightQuote::NoAirport => f.write_str(NO_AIRPORT),
            FlightQuote::Unavailable => f.write_str(NO_FLIGHT_DATA),
        }
    }
}

/// Ordered, never-empty list of attraction names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attractions(Vec<String>);

impl Attractions {
    /// Wrap discovered names, falling back to the sentinel when there are none
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        if names.is_empty() {
            Self::not_found()
        } else {
            Self(names)
        }
    }

    /// The `["No attractions found"]` placeholder
    #[must_use]
    pub fn not_found() -> Self {
        Self(vec![NO_ATTRACTIONS.to_string()])
    }

    /// Names joined with `", "`, as used in prompts and fallback plans
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// One day of the generated itinerary, as sent to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1-indexed day number
    pub day: u32,
    pub plan: String,
    pub weather: String,
    pub flights: String,
    pub attractions: Vec<String>,
}
