//! HTTP API
//!
//! `POST /get_itinerary` accepts `{"destination": <string>, "days": <string|number>}`
//! and answers with an array of day objects.

use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
};
use serde::Deserialize;
use serde_json::{Number, json};
use tracing::{error, warn};

use crate::models::{DayPlan, ItineraryRequest};
use crate::planner::ItineraryPlanner;
use crate::{PlannerError, Result};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<ItineraryPlanner>,
    /// Largest accepted `days` value
    pub max_days: u32,
}

/// `days` as sent by clients: a JSON number or a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DaysField {
    Number(Number),
    Text(String),
}

impl DaysField {
    fn to_whole_number(&self) -> Option<i64> {
        match self {
            DaysField::Number(number) => number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|value| value.fract() == 0.0 && value.abs() < i64::MAX as f64)
                    .map(|value| value as i64)
            }),
            DaysField::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Raw itinerary request body
#[derive(Debug, Clone, Deserialize)]
pub struct ItineraryForm {
    pub destination: Option<String>,
    pub days: Option<DaysField>,
}

impl ItineraryForm {
    /// Coerce and bound-check the raw body
    pub fn into_request(self, max_days: u32) -> Result<ItineraryRequest> {
        let destination = self
            .destination
            .map(|destination| destination.trim().to_string())
            .filter(|destination| !destination.is_empty())
            .ok_or_else(|| PlannerError::validation("destination is required"))?;

        let days = self
            .days
            .ok_or_else(|| PlannerError::validation("days is required"))?
            .to_whole_number()
            .ok_or_else(|| PlannerError::validation("days must be a whole number"))?;

        if days < 1 || days > i64::from(max_days) {
            return Err(PlannerError::validation(format!(
                "days must be between 1 and {max_days}, got {days}"
            )));
        }

        Ok(ItineraryRequest {
            destination,
            // bounded by max_days above
            days: days as u32,
        })
    }
}

impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        let status = match &self {
            PlannerError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Itinerary request failed: {}", self);
        } else {
            warn!("Rejected itinerary request: {}", self);
        }

        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/get_itinerary", post(get_itinerary))
        .with_state(state)
}

async fn get_itinerary(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ItineraryForm>, JsonRejection>,
) -> Result<Json<Vec<DayPlan>>> {
    let Json(form) = payload.map_err(|rejection| PlannerError::validation(rejection.body_text()))?;
    let request = form.into_request(state.max_days)?;

    let itinerary = state.planner.plan(&request).await?;
    Ok(Json(itinerary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn form(body: serde_json::Value) -> ItineraryForm {
        serde_json::from_value(body).unwrap()
    }

    #[rstest]
    #[case(json!({"destination": "Mumbai", "days": 2}), 2)]
    #[case(json!({"destination": "Mumbai", "days": "3"}), 3)]
    #[case(json!({"destination": "Mumbai", "days": " 4 "}), 4)]
    #[case(json!({"destination": "Mumbai", "days": 5.0}), 5)]
    #[case(json!({"destination": "Mumbai", "days": 30}), 30)]
    fn test_days_coercion(#[case] body: serde_json::Value, #[case] expected: u32) {
        let request = form(body).into_request(30).unwrap();
        assert_eq!(request.days, expected);
        assert_eq!(request.destination, "Mumbai");
    }

    #[rstest]
    #[case(json!({"destination": "Mumbai", "days": 0}))]
    #[case(json!({"destination": "Mumbai", "days": -2}))]
    #[case(json!({"destination": "Mumbai", "days": 31}))]
    #[case(json!({"destination": "Mumbai", "days": 2.5}))]
    #[case(json!({"destination": "Mumbai", "days": "two"}))]
    #[case(json!({"destination": "Mumbai", "days": "99999999999999999999"}))]
    #[case(json!({"destination": "Mumbai"}))]
    #[case(json!({"destination": "   ", "days": 1}))]
    #[case(json!({"days": 1}))]
    fn test_invalid_requests_rejected(#[case] body: serde_json::Value) {
        let err = form(body).into_request(30).unwrap_err();
        assert!(matches!(err, PlannerError::Validation { .. }));
    }

    #[test]
    fn test_destination_is_trimmed() {
        let request = form(json!({"destination": "  Goa ", "days": 1})).into_request(30).unwrap();
        assert_eq!(request.destination, "Goa");
    }

    #[test]
    fn test_error_status_codes() {
        let response = PlannerError::validation("bad days").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = PlannerError::upstream("weather", "down").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
