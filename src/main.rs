//! Eventbook server: a multi-tenant event booking API with capacity-bound
//! admission and a first-come waitlist.

use log::*;
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new();
    Logger::init_logger(&config)?;

    info!("Starting up eventbook_rs...");
    info!("Connecting to database [{}]...", config.database_url());

    let db = Arc::new(service::init_database(&config).await?);

    let app_state = AppState::new(config, &db);

    web::init_server(app_state).await
}
