//! Tour catalog refresh HTTP microservice.
//!
//! Simulates scraping the catalogs of six tour operators. A POST replaces
//! the whole tours table with a freshly generated dataset inside one
//! transaction, so readers never observe an empty or partially refreshed
//! catalog; a GET returns the stored catalog verbatim, cheapest first.
//!
//! # Endpoints
//!
//! - `GET /api/v1/catalog` - Read the stored catalog
//! - `POST /api/v1/catalog` - Regenerate and replace the catalog
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! # Configuration
//!
//! - `TOURFLOW_DATABASE_PATH` - Path to the SQLite database (required)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)

use std::env;
use std::net::SocketAddr;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use chrono::Local;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use tourflow_lib::{scrape_operator_feeds, Tour};
use tourflow_service_shared::{
    cors_layer, generate_request_id, health_live, health_ready, init_logging, preflight, ApiError,
    AppState, LoggingConfig,
};

/// Stored catalog as returned by GET.
#[derive(Debug, Serialize)]
struct CatalogListing {
    tours: Vec<Tour>,
}

/// Refresh outcome as returned by POST.
#[derive(Debug, Serialize)]
struct RefreshOutcome {
    success: bool,
    message: String,
    count: usize,
    timestamp: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("scraper");
    init_logging(&logging_config);

    let state = AppState::from_env();
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    info!(db_path = %state.db_path().display(), port, "starting scraper service");

    // One-time schema init; handlers never run DDL.
    state.init_store().map_err(|e| {
        error!(error = %e, "failed to initialize store");
        e
    })?;

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the service router.
///
/// Methods other than GET/POST/OPTIONS get an explicit 405 instead of
/// silently falling through to the read path.
fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/catalog",
            get(read_catalog)
                .post(refresh_catalog)
                .options(catalog_preflight)
                .fallback(method_not_allowed),
        )
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Handle GET /api/v1/catalog requests.
async fn read_catalog(State(state): State<AppState>) -> Result<Json<CatalogListing>, ApiError> {
    let request_id = generate_request_id();

    let store = state.open_store().map_err(|e| {
        error!(request_id = %request_id, error = %e, "failed to open store");
        ApiError::from_lib_error(&e)
    })?;

    let tours = store.list_catalog().map_err(|e| {
        error!(request_id = %request_id, error = %e, "catalog read failed");
        ApiError::from_lib_error(&e)
    })?;

    info!(request_id = %request_id, total = tours.len(), "catalog read completed");

    Ok(Json(CatalogListing { tours }))
}

/// Handle POST /api/v1/catalog requests.
async fn refresh_catalog(State(state): State<AppState>) -> Result<Json<RefreshOutcome>, ApiError> {
    let request_id = generate_request_id();

    info!(request_id = %request_id, "handling catalog refresh");

    let scraped = scrape_operator_feeds(&mut rand::rng());

    let mut store = state.open_store().map_err(|e| {
        error!(request_id = %request_id, error = %e, "failed to open store");
        ApiError::from_lib_error(&e)
    })?;

    let count = store.replace_catalog(&scraped).map_err(|e| {
        error!(request_id = %request_id, error = %e, "catalog replace failed");
        ApiError::from_lib_error(&e)
    })?;

    info!(request_id = %request_id, count, "catalog refreshed");

    Ok(Json(RefreshOutcome {
        success: true,
        message: format!("Обновлено {count} туров"),
        count,
        timestamp: Local::now().to_rfc3339(),
    }))
}

async fn catalog_preflight() -> axum::response::Response {
    preflight("GET, POST, OPTIONS")
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
