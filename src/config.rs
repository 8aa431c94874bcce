//! Configuration management for the itinerary planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings. The resulting
//! [`PlannerConfig`] is built once at start-up and handed to every client.

use crate::PlannerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the itinerary planner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Mapping/places provider configuration
    #[serde(default)]
    pub maps: MapsConfig,
    /// Flight provider configuration
    #[serde(default)]
    pub flights: FlightsConfig,
    /// Encyclopedia search configuration
    #[serde(default)]
    pub encyclopedia: EncyclopediaConfig,
    /// Attraction discovery settings
    #[serde(default)]
    pub attractions: AttractionsConfig,
    /// Language model configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// API key sent as the `appid` query parameter
    #[serde(default)]
    pub api_key: String,
    /// Endpoint for current conditions by city name
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Unit system requested from the provider
    #[serde(default = "default_weather_units")]
    pub units: String,
}

/// Mapping/places API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    #[serde(default)]
    pub api_key: String,
    /// Text-search endpoint
    #[serde(default = "default_maps_base_url")]
    pub base_url: String,
}

/// A single row of the static city to airport table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportEntry {
    pub city: String,
    /// 3-letter IATA code
    pub code: String,
}

/// Flight provider configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightsConfig {
    /// OAuth2 client id for the client-credentials grant
    #[serde(default)]
    pub client_id: String,
    /// OAuth2 client secret for the client-credentials grant
    #[serde(default)]
    pub client_secret: String,
    /// Provider root, token and search paths are appended to it
    #[serde(default = "default_flights_base_url")]
    pub base_url: String,
    /// Fixed departure airport
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_adults")]
    pub adults: u32,
    /// Number of offers requested per search
    #[serde(default = "default_max_offers")]
    pub max_results: u32,
    /// City to airport lookup table
    #[serde(default = "default_airports")]
    pub airports: Vec<AirportEntry>,
    /// Ask the provider's location search for cities missing from the table
    #[serde(default)]
    pub resolve_unknown_cities: bool,
}

/// Encyclopedia search configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncyclopediaConfig {
    #[serde(default = "default_encyclopedia_base_url")]
    pub base_url: String,
    /// The encyclopedia rejects anonymous clients, so a descriptive agent is required
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Attraction discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttractionsConfig {
    /// Which source feeds the itinerary: `wikipedia` or `places`
    #[serde(default = "default_attraction_source")]
    pub source: String,
    /// Maximum names kept from the encyclopedia extract
    #[serde(default = "default_max_attractions")]
    pub max_results: usize,
}

/// Language model configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Bearer key for the chat-completions endpoint
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Completion budget per day plan
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the landing page served at `/`
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Upper bound accepted for the `days` field
    #[serde(default = "default_max_days")]
    pub max_days: u32,
    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_weather_units() -> String {
    "metric".to_string()
}

fn default_maps_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place/textsearch/json".to_string()
}

fn default_flights_base_url() -> String {
    "https://test.api.amadeus.com".to_string()
}

fn default_origin() -> String {
    "DEL".to_string()
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_adults() -> u32 {
    1
}

fn default_max_offers() -> u32 {
    1
}

fn default_airports() -> Vec<AirportEntry> {
    [
        ("Dehradun", "DED"),
        ("Delhi", "DEL"),
        ("Mumbai", "BOM"),
        ("Bangalore", "BLR"),
        ("Kolkata", "CCU"),
    ]
    .into_iter()
    .map(|(city, code)| AirportEntry {
        city: city.to_string(),
        code: code.to_string(),
    })
    .collect()
}

fn default_encyclopedia_base_url() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_user_agent() -> String {
    format!("TravelPlanner/{} (itinerary backend)", crate::VERSION)
}

fn default_attraction_source() -> String {
    "wikipedia".to_string()
}

fn default_max_attractions() -> usize {
    5
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o".to_string()
}

fn default_llm_max_tokens() -> u32 {
    150
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_max_days() -> u32 {
    30
}

fn default_max_body_bytes() -> usize {
    16 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_weather_base_url(),
            units: default_weather_units(),
        }
    }
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_maps_base_url(),
        }
    }
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            base_url: default_flights_base_url(),
            origin: default_origin(),
            currency: default_currency(),
            adults: default_adults(),
            max_results: default_max_offers(),
            airports: default_airports(),
            resolve_unknown_cities: false,
        }
    }
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            base_url: default_encyclopedia_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for AttractionsConfig {
    fn default() -> Self {
        Self {
            source: default_attraction_source(),
            max_results: default_max_attractions(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            max_tokens: default_llm_max_tokens(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            max_days: default_max_days(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TRAVELPLANNER_WEATHER__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("TRAVELPLANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travelplanner").join("config.toml"))
    }

    /// Apply default values to fields left blank by a config source
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.units.is_empty() {
            self.weather.units = default_weather_units();
        }
        if self.maps.base_url.is_empty() {
            self.maps.base_url = default_maps_base_url();
        }
        if self.flights.base_url.is_empty() {
            self.flights.base_url = default_flights_base_url();
        }
        if self.flights.origin.is_empty() {
            self.flights.origin = default_origin();
        }
        if self.flights.currency.is_empty() {
            self.flights.currency = default_currency();
        }
        if self.flights.adults == 0 {
            self.flights.adults = default_adults();
        }
        if self.flights.max_results == 0 {
            self.flights.max_results = default_max_offers();
        }
        if self.encyclopedia.user_agent.is_empty() {
            self.encyclopedia.user_agent = default_user_agent();
        }
        if self.attractions.max_results == 0 {
            self.attractions.max_results = default_max_attractions();
        }
        if self.llm.model.is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.llm.max_tokens == 0 {
            self.llm.max_tokens = default_llm_max_tokens();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_airports()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Names of the credentials that are still empty placeholders
    #[must_use]
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.weather.api_key.is_empty() {
            missing.push("weather.api_key");
        }
        if self.maps.api_key.is_empty() {
            missing.push("maps.api_key");
        }
        if self.flights.client_id.is_empty() {
            missing.push("flights.client_id");
        }
        if self.flights.client_secret.is_empty() {
            missing.push("flights.client_secret");
        }
        if self.llm.api_key.is_empty() {
            missing.push("llm.api_key");
        }
        missing
    }

    fn validate_urls(&self) -> Result<()> {
        let urls = [
            ("weather.base_url", &self.weather.base_url),
            ("maps.base_url", &self.maps.base_url),
            ("flights.base_url", &self.flights.base_url),
            ("encyclopedia.base_url", &self.encyclopedia.base_url),
            ("llm.base_url", &self.llm.base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(PlannerError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }
        Ok(())
    }

    fn validate_airports(&self) -> Result<()> {
        let is_iata = |code: &str| code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic());

        if !is_iata(&self.flights.origin) {
            return Err(PlannerError::config(format!(
                "Origin airport '{}' is not a 3-letter IATA code",
                self.flights.origin
            ))
            .into());
        }

        for entry in &self.flights.airports {
            if entry.city.trim().is_empty() {
                return Err(PlannerError::config("Airport table contains an empty city name").into());
            }
            if !is_iata(&entry.code) {
                return Err(PlannerError::config(format!(
                    "Airport code '{}' for {} is not a 3-letter IATA code",
                    entry.code, entry.city
                ))
                .into());
            }
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.max_days == 0 || self.server.max_days > 365 {
            return Err(PlannerError::config("server.max_days must be between 1 and 365").into());
        }

        if self.attractions.max_results > 20 {
            return Err(PlannerError::config("attractions.max_results cannot exceed 20").into());
        }

        if self.llm.max_tokens > 4096 {
            return Err(PlannerError::config("llm.max_tokens cannot exceed 4096").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_sources = ["wikipedia", "places"];
        if !valid_sources.contains(&self.attractions.source.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid attraction source '{}'. Must be one of: {}",
                self.attractions.source,
                valid_sources.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
