//! Flight pricing
//!
//! Resolves the destination to an airport, obtains an access token from the
//! flight provider and asks for the cheapest offer departing tomorrow from the
//! configured origin. Provider failures propagate, an answer without a usable
//! offer becomes [`FlightQuote::Unavailable`].

pub mod airports;
pub mod amadeus;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::FlightsConfig;
use crate::models::FlightQuote;
use crate::{PlannerError, Result};

pub use airports::AirportDirectory;
pub use amadeus::AmadeusClient;

pub(crate) const SERVICE: &str = "flights";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters of a single flight-offer search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub adults: u32,
    pub currency: String,
    pub max_results: u32,
}

impl OfferQuery {
    /// Query string in the provider's parameter names
    #[must_use]
    pub fn to_query_string(&self) -> String {
        format!(
            "originLocationCode={}&destinationLocationCode={}&adults={}&currencyCode={}&departureDate={}&max={}",
            urlencoding::encode(&self.origin),
            urlencoding::encode(&self.destination),
            self.adults,
            urlencoding::encode(&self.currency),
            self.departure_date.format(DATE_FORMAT),
            self.max_results
        )
    }
}

/// Flight provider speaking a token + search protocol
#[async_trait]
pub trait FlightProvider: Send + Sync {
    /// Obtain a short-lived bearer token
    async fn access_token(&self) -> Result<String>;

    /// Search offers, returning the raw response document
    async fn search_offers(&self, token: &str, query: &OfferQuery) -> Result<Value>;

    /// Look up the IATA code of a city by name
    async fn locate_city(&self, token: &str, city: &str) -> Result<Option<String>>;
}

/// Departure date used for every search: tomorrow in the server's local clock
#[must_use]
pub fn default_departure_date() -> NaiveDate {
    let today = Local::now().date_naive();
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}

/// Pull price and validating airline out of the first offer
pub fn extract_offer(response: &Value) -> Result<FlightQuote> {
    let offer = response
        .get("data")
        .and_then(|data| data.get(0))
        .ok_or_else(|| PlannerError::no_data(SERVICE, "response holds no offers"))?;

    let price = match offer.pointer("/price/total") {
        Some(Value::String(total)) => total.clone(),
        Some(Value::Number(total)) => total.to_string(),
        _ => return Err(PlannerError::no_data(SERVICE, "offer has no total price")),
    };

    let airline = offer
        .pointer("/validatingAirlineCodes/0")
        .and_then(Value::as_str)
        .ok_or_else(|| PlannerError::no_data(SERVICE, "offer has no validating airline"))?
        .to_string();

    Ok(FlightQuote::Offer { price, airline })
}

/// Flight price lookup for a destination
pub struct FlightPricing {
    provider: Arc<dyn FlightProvider>,
    airports: AirportDirectory,
    origin: String,
    currency: String,
    adults: u32,
    max_results: u32,
    resolve_unknown_cities: bool,
}

impl FlightPricing {
    pub fn new(provider: Arc<dyn FlightProvider>, config: &FlightsConfig) -> Self {
        Self {
            provider,
            airports: AirportDirectory::new(config.airports.clone()),
            origin: config.origin.clone(),
            currency: config.currency.clone(),
            adults: config.adults,
            max_results: config.max_results,
            resolve_unknown_cities: config.resolve_unknown_cities,
        }
    }

    /// Quote for a departure tomorrow, with "no offer" folded into the sentinel
    pub async fn quote(&self, destination: &str) -> Result<FlightQuote> {
        match self.try_quote(destination, default_departure_date()).await {
            Err(e) if e.is_no_data() => {
                warn!("No flight data for '{}': {}", destination, e);
                Ok(FlightQuote::Unavailable)
            }
            other => other,
        }
    }

    /// Classified lookup: `NoData` errors mean the provider had no usable offer
    #[instrument(skip(self))]
    pub async fn try_quote(&self, destination: &str, departure_date: NaiveDate) -> Result<FlightQuote> {
        let known_code = self.airports.code_for(destination).map(str::to_string);

        if known_code.is_none() && !self.resolve_unknown_cities {
            info!("No airport mapped for '{}'", destination);
            return Ok(FlightQuote::NoAirport);
        }

        let token = self.provider.access_token().await?;

        let code = match known_code {
            Some(code) => code,
            None => match self.provider.locate_city(&token, destination).await {
                Ok(Some(code)) => code,
                Ok(None) => return Ok(FlightQuote::NoAirport),
                Err(e) if e.is_no_data() => {
                    debug!("City search found nothing for '{}': {}", destination, e);
                    return Ok(FlightQuote::NoAirport);
                }
                Err(e) => return Err(e),
            },
        };

        let query = OfferQuery {
            origin: self.origin.clone(),
            destination: code,
            departure_date,
            adults: self.adults,
            currency: self.currency.clone(),
            max_results: self.max_results,
        };
        info!("Searching flights {} -> {} on {}", query.origin, query.destination, query.departure_date);

        let response = self.provider.search_offers(&token, &query).await?;
        debug!("Flight data received: {}", response);

        let quote = extract_offer(&response)?;
        info!("Flight information: {}", quote);
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeProvider {
        token_calls: AtomicUsize,
        search_calls: AtomicUsize,
        locate_calls: AtomicUsize,
        response: Value,
        located: Option<String>,
        queries: Mutex<Vec<OfferQuery>>,
        fail_token: bool,
    }

    #[async_trait]
    impl FlightProvider for FakeProvider {
        async fn access_token(&self) -> Result<String> {
            self.token_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_token {
                return Err(PlannerError::upstream(SERVICE, "connection refused"));
            }
            Ok("token-123".to_string())
        }

        async fn search_offers(&self, token: &str, query: &OfferQuery) -> Result<Value> {
            assert_eq!(token, "token-123");
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());
            Ok(self.response.clone())
        }

        async fn locate_city(&self, _token: &str, _city: &str) -> Result<Option<String>> {
            self.locate_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.located.clone())
        }
    }

    fn offer_response() -> Value {
        json!({
            "data": [{
                "price": {"currency": "INR", "total": "5234.00"},
                "validatingAirlineCodes": ["6E"]
            }]
        })
    }

    fn pricing(provider: Arc<FakeProvider>, config: &FlightsConfig) -> FlightPricing {
        FlightPricing::new(provider, config)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[rstest]
    #[case(json!({"data": []}))]
    #[case(json!({"errors": [{"status": 401, "title": "Invalid access token"}]}))]
    #[case(json!({"data": [{"price": {}}]}))]
    #[case(json!({"data": [{"price": {"total": "100"}, "validatingAirlineCodes": []}]}))]
    fn test_extract_offer_no_data(#[case] response: Value) {
        let err = extract_offer(&response).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_extract_offer_numeric_price() {
        let response = json!({"data": [{"price": {"total": 4100.5}, "validatingAirlineCodes": ["AI"]}]});
        assert_eq!(
            extract_offer(&response).unwrap(),
            FlightQuote::Offer {
                price: "4100.5".to_string(),
                airline: "AI".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_mapped_city_searches_once() {
        let provider = Arc::new(FakeProvider {
            response: offer_response(),
            ..FakeProvider::default()
        });
        let pricing = pricing(provider.clone(), &FlightsConfig::default());

        let quote = pricing.try_quote("Mumbai", date()).await.unwrap();

        assert_eq!(quote.to_string(), "Cheapest flight ~₹5234.00 via 6E");
        assert_eq!(provider.token_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.search_calls.load(Ordering::SeqCst), 1);

        let queries = provider.queries.lock().unwrap();
        assert_eq!(queries[0].origin, "DEL");
        assert_eq!(queries[0].destination, "BOM");
        assert_eq!(queries[0].currency, "INR");
        assert_eq!(queries[0].adults, 1);
        assert_eq!(queries[0].max_results, 1);
        assert_eq!(queries[0].departure_date, date());
    }

    #[tokio::test]
    async fn test_unmapped_city_skips_provider() {
        let provider = Arc::new(FakeProvider::default());
        let pricing = pricing(provider.clone(), &FlightsConfig::default());

        let quote = pricing.quote("Atlantis").await.unwrap();

        assert_eq!(quote, FlightQuote::NoAirport);
        assert_eq!(quote.to_string(), "No airport found for this city");
        assert_eq!(provider.token_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.search_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.locate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_offer_list_becomes_sentinel() {
        let provider = Arc::new(FakeProvider {
            response: json!({"meta": {"count": 0}, "data": []}),
            ..FakeProvider::default()
        });
        let pricing = pricing(provider, &FlightsConfig::default());

        let classified = pricing.try_quote("Kolkata", date()).await.unwrap_err();
        assert!(classified.is_no_data());

        let quote = pricing.quote("Kolkata").await.unwrap();
        assert_eq!(quote.to_string(), "No flight data available");
    }

    #[tokio::test]
    async fn test_token_failure_propagates() {
        let provider = Arc::new(FakeProvider {
            fail_token: true,
            ..FakeProvider::default()
        });
        let pricing = pricing(provider.clone(), &FlightsConfig::default());

        let err = pricing.quote("Delhi").await.unwrap_err();
        assert!(err.is_upstream());
        assert_eq!(provider.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lowercase_city_is_not_mapped() {
        let provider = Arc::new(FakeProvider {
            response: offer_response(),
            ..FakeProvider::default()
        });
        let pricing = pricing(provider.clone(), &FlightsConfig::default());

        let quote = pricing.quote("mumbai").await.unwrap();

        assert_eq!(quote.to_string(), "No airport found for this city");
        assert_eq!(provider.token_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dynamic_resolution_when_enabled() {
        let provider = Arc::new(FakeProvider {
            response: offer_response(),
            located: Some("GOI".to_string()),
            ..FakeProvider::default()
        });
        let config = FlightsConfig {
            resolve_unknown_cities: true,
            ..FlightsConfig::default()
        };
        let pricing = pricing(provider.clone(), &config);

        pricing.try_quote("Goa", date()).await.unwrap();

        assert_eq!(provider.locate_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.queries.lock().unwrap()[0].destination, "GOI");
    }

    #[tokio::test]
    async fn test_dynamic_resolution_miss() {
        let provider = Arc::new(FakeProvider::default());
        let config = FlightsConfig {
            resolve_unknown_cities: true,
            ..FlightsConfig::default()
        };
        let pricing = pricing(provider.clone(), &config);

        let quote = pricing.try_quote("Atlantis", date()).await.unwrap();

        assert_eq!(quote, FlightQuote::NoAirport);
        assert_eq!(provider.search_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_query_string() {
        let query = OfferQuery {
            origin: "DEL".to_string(),
            destination: "BOM".to_string(),
            departure_date: date(),
            adults: 1,
            currency: "INR".to_string(),
            max_results: 1,
        };
        assert_eq!(
            query.to_query_string(),
            "originLocationCode=DEL&destinationLocationCode=BOM&adults=1&currencyCode=INR&departureDate=2026-03-14&max=1"
        );
    }

    #[test]
    fn test_default_departure_is_tomorrow() {
        let today = Local::now().date_naive();
        let departure = default_departure_date();
        assert!(departure > today);
    }
}
