//! Amadeus self-service API client
//!
//! Tokens come from the OAuth2 client-credentials grant; offers and city
//! lookups are plain bearer-authenticated GETs.

use async_trait::async_trait;
use oauth2::basic::{BasicClient, BasicErrorResponseType};
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthType, AuthUrl, ClientId, ClientSecret, RequestTokenError, StandardErrorResponse,
    TokenResponse, TokenUrl,
};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::{FlightProvider, OfferQuery, SERVICE};
use crate::config::FlightsConfig;
use crate::{PlannerError, Result};

type TokenError<RE> = RequestTokenError<RE, StandardErrorResponse<BasicErrorResponseType>>;

/// Flight provider backed by the Amadeus REST API
pub struct AmadeusClient {
    oauth: BasicClient,
    http: Client,
    base_url: String,
}

impl AmadeusClient {
    pub fn new(config: &FlightsConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        // The client-credentials grant never visits the authorize endpoint.
        let auth_url = AuthUrl::new(format!("{base_url}/v1/security/oauth2/authorize"))
            .map_err(|e| PlannerError::config(format!("Invalid flight auth URL: {e}")))?;
        let token_url = TokenUrl::new(format!("{base_url}/v1/security/oauth2/token"))
            .map_err(|e| PlannerError::config(format!("Invalid flight token URL: {e}")))?;

        let oauth = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
            auth_url,
            Some(token_url),
        )
        .set_auth_type(AuthType::RequestBody);

        let http = Client::builder()
            .user_agent(concat!("TravelPlanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            oauth,
            http,
            base_url,
        })
    }

    fn offers_url(&self, query: &OfferQuery) -> String {
        format!("{}/v2/shopping/flight-offers?{}", self.base_url, query.to_query_string())
    }

    fn locations_url(&self, city: &str) -> String {
        format!(
            "{}/v1/reference-data/locations?keyword={}&subType=CITY",
            self.base_url,
            urlencoding::encode(city)
        )
    }

    /// GET a bearer-authenticated JSON document. Error statuses still carry a
    /// JSON body, which callers inspect for the fields they need.
    async fn get_json(&self, url: &str, token: &str) -> Result<Value> {
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PlannerError::upstream(SERVICE, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Flight API answered HTTP {}", status);
        }

        response
            .json()
            .await
            .map_err(|e| PlannerError::upstream(SERVICE, format!("invalid response body: {e}")))
    }
}

/// Transport failures mean the provider is down; a refusal or an unreadable
/// token body means it answered without granting a token.
fn classify_token_error<RE: std::error::Error + 'static>(err: TokenError<RE>) -> PlannerError {
    match err {
        RequestTokenError::ServerResponse(response) => {
            PlannerError::no_data(SERVICE, format!("token request refused: {response}"))
        }
        RequestTokenError::Parse(e, _) => {
            PlannerError::no_data(SERVICE, format!("token response has no access token: {e}"))
        }
        RequestTokenError::Request(e) => {
            PlannerError::upstream(SERVICE, format!("token request failed: {e}"))
        }
        RequestTokenError::Other(message) => PlannerError::upstream(SERVICE, message),
    }
}

#[async_trait]
impl FlightProvider for AmadeusClient {
    #[instrument(skip(self))]
    async fn access_token(&self) -> Result<String> {
        debug!("Requesting flight API access token");
        let token = self
            .oauth
            .exchange_client_credentials()
            .request_async(async_http_client)
            .await
            .map_err(classify_token_error)?;

        Ok(token.access_token().secret().clone())
    }

    #[instrument(skip(self, token))]
    async fn search_offers(&self, token: &str, query: &OfferQuery) -> Result<Value> {
        let url = self.offers_url(query);
        info!("Flight offers URL: {}", url);
        self.get_json(&url, token).await
    }

    #[instrument(skip(self, token))]
    async fn locate_city(&self, token: &str, city: &str) -> Result<Option<String>> {
        let response = self.get_json(&self.locations_url(city), token).await?;
        debug!("IATA code response: {}", response);

        Ok(response
            .pointer("/data/0/iataCode")
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}
