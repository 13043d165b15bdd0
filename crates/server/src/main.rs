mod api;
mod dto;
mod state;

use crate::state::AppState;
use albion_transit::{config::Config, route::RouteService};
use axum::routing::get;
use std::{process, sync::Arc, time::Instant};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

const PORT: u32 = 3000;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Failed loading RAIL_DATA_PATH: {}", err);
            process::exit(1);
        }
    };

    info!("Loading dataset from {}...", config.dataset_root.display());
    let now = Instant::now();
    let (service, load_errors) = RouteService::load(&config.dataset_root, config);
    for err in &load_errors {
        warn!(%err, "dataset file skipped");
    }
    info!(
        "Loaded {} stations / {} lines in {:?}",
        service.repository().station_count(),
        service.repository().line_count(),
        now.elapsed()
    );

    let app_state = Arc::new(AppState {
        service: RwLock::new(service),
    });

    info!("Starting server...");
    let app = axum::Router::new()
        .route("/search", get(api::search))
        .route("/route", get(api::route))
        .route("/routes", get(api::routes))
        .route("/destinations", get(api::destinations))
        .route("/reload", get(api::reload))
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", PORT))
        .await
        .unwrap();
    info!("Listening on port {PORT}");
    axum::serve(listener, app).await.unwrap();
}
