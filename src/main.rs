use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use travelplanner::{ItineraryPlanner, PlannerConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = PlannerConfig::load()?;
    logging::init(&config.logging)?;

    info!("Starting travelplanner v{}", travelplanner::VERSION);
    let missing = config.missing_credentials();
    if !missing.is_empty() {
        warn!("Credentials not configured: {}", missing.join(", "));
    }

    let planner = Arc::new(ItineraryPlanner::from_config(&config)?);
    web::run(&config, planner).await
}
