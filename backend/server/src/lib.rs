//! Recipe lookup over TheMealDB, filtered by cuisine area and/or category.
//!
//!
//!
//! # General Flow
//! - `GET /` loads both filter lists together and hands the page a fresh session id
//! - If either list fails the page says filters are unavailable and offers nothing else
//! - Changing a select sends `GET /meals?session=&area=&category=`
//! - The session skips a selection identical to the last one that started a cycle (`204`)
//! - Otherwise the selection is resolved against the provider and rendered as cards
//! - Clicking a card (or Enter/Space on it) sends `GET /meals/{id}` and shows the detail view
//! - Dismissing the detail view goes back to the cards without another query
//!
//!
//!
//! # Stale Responses
//!
//! Nothing cancels a resolution already in flight. Each cycle that starts gets a
//! sequence number from its session, and when it finishes its outcome is only
//! returned if no newer cycle started meanwhile. Older ones answer `204` and the
//! browser keeps what it shows.
//!
//!
//!
//! # Environment
//! - `RUST_PORT`: listen port, default 1111
//! - `MEALDB_URL`: provider base, default `https://www.themealdb.com/api/json/v1`
//! - `MEALDB_KEY`: provider key, also read from `/run/secrets/MEALDB_KEY`, default the public `1`
//! - `MEALDB_TIMEOUT_MS`: per request timeout, default 8000
//! - `RUST_MAX_SESSIONS`: sessions kept before the oldest is dropped, default 1024
//! - `RUST_LOG`: log filter
//!
//!
//!
//! # Setup
//!
//! Run.
//! ```sh
//! RUST_LOG=info cargo run -p recipes
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{future::pending, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod controls;
pub mod error;
pub mod reconcile;
pub mod render;
pub mod routes;
pub mod selection;
pub mod state;
pub mod utils;

use config::Config;
use routes::{
    health_handler, index_handler, meal_handler, meals_handler, script_handler, style_handler,
};
use state::AppState;

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config)?;

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(index_handler))
        .route("/meals", get(meals_handler))
        .route("/meals/{id}", get(meal_handler))
        .route("/app.js", get(script_handler))
        .route("/style.css", get(style_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
