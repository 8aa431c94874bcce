use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::PlannerConfig;
use crate::planner::ItineraryPlanner;

/// Full application: itinerary API plus the static front page
pub fn app(config: &PlannerConfig, planner: Arc<ItineraryPlanner>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState {
        planner,
        max_days: config.server.max_days,
    };

    api::router(state)
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .layer(RequestBodyLimitLayer::new(config.server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(config: &PlannerConfig, planner: Arc<ItineraryPlanner>) -> Result<()> {
    let app = app(config, planner);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Web server terminated")?;
    Ok(())
}
