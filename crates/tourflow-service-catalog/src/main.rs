//! Tour catalog query HTTP microservice.
//!
//! This service answers the website's tour search: it filters the stored
//! catalog by destination, price window, category, and hotel stars, and
//! always returns fully populated tour objects.
//!
//! # Endpoints
//!
//! - `GET /api/v1/tours` - Query the catalog with optional filters
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
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use tourflow_lib::{CatalogFilter, Tour};
use tourflow_service_shared::{
    cors_layer, generate_request_id, health_live, health_ready, init_logging, preflight, ApiError,
    AppState, LoggingConfig,
};

/// Raw query parameters as sent by the website.
///
/// Numeric parameters stay strings here: there is no pre-validation
/// contract for them, so parse failures surface as internal errors from
/// the filter builder rather than as rejections at the extractor.
#[derive(Debug, Default, Deserialize)]
struct CatalogParams {
    destination: Option<String>,
    #[serde(rename = "priceMin")]
    price_min: Option<String>,
    #[serde(rename = "priceMax")]
    price_max: Option<String>,
    category: Option<String>,
    stars: Option<String>,
}

/// Catalog query response returned to the caller.
#[derive(Debug, Serialize)]
struct CatalogResponse {
    tours: Vec<Tour>,
    total: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("catalog");
    init_logging(&logging_config);

    let state = AppState::from_env();
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    info!(db_path = %state.db_path().display(), port, "starting catalog service");

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
fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/tours",
            get(list_tours)
                .options(catalog_preflight)
                .fallback(method_not_allowed),
        )
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Handle GET /api/v1/tours requests.
async fn list_tours(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let request_id = generate_request_id();

    info!(
        request_id = %request_id,
        destination = ?params.destination,
        price_min = ?params.price_min,
        price_max = ?params.price_max,
        category = ?params.category,
        stars = ?params.stars,
        "handling catalog query"
    );

    let filter = CatalogFilter::from_query(
        params.destination.as_deref(),
        params.price_min.as_deref(),
        params.price_max.as_deref(),
        params.category.as_deref(),
        params.stars.as_deref(),
    )
    .map_err(|e| {
        error!(request_id = %request_id, error = %e, "rejecting malformed filter");
        ApiError::from_lib_error(&e)
    })?;

    let store = state.open_store().map_err(|e| {
        error!(request_id = %request_id, error = %e, "failed to open store");
        ApiError::from_lib_error(&e)
    })?;

    let tours = store.query_tours(&filter).map_err(|e| {
        error!(request_id = %request_id, error = %e, "catalog query failed");
        ApiError::from_lib_error(&e)
    })?;

    info!(request_id = %request_id, total = tours.len(), "catalog query completed");

    Ok(Json(CatalogResponse {
        total: tours.len(),
        tours,
    }))
}

async fn catalog_preflight() -> axum::response::Response {
    preflight("GET, OPTIONS")
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};
    use axum_test::TestServer;
    use tourflow_service_shared::test_utils::{scratch_state, seed_tour};

    fn server(state: AppState) -> TestServer {
        TestServer::new(app(state)).expect("test server")
    }

    #[tokio::test]
    async fn empty_catalog_returns_zero_total() {
        let (state, _dir) = scratch_state();
        let response = server(state).get("/api/v1/tours").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["total"], 0);
        assert_eq!(body["tours"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn tours_come_back_defaulted_and_sorted() {
        let (state, _dir) = scratch_state();
        seed_tour(&state, "Дорогой", 300_000, "beach");
        seed_tour(&state, "Дешёвый", 150_000, "beach");

        let response = server(state).get("/api/v1/tours").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["total"], 2);
        let tours = body["tours"].as_array().unwrap();
        assert_eq!(tours[0]["title"], "Дешёвый");
        assert_eq!(tours[0]["rating"], 4.5);
        assert_eq!(tours[0]["nights"], 7);
        assert_eq!(tours[0]["departure"], "Москва");
        assert_eq!(tours[0]["flightIncluded"], true);
    }

    #[tokio::test]
    async fn category_filter_is_exact() {
        let (state, _dir) = scratch_state();
        seed_tour(&state, "Пляж", 150_000, "beach");
        seed_tour(&state, "Музеи", 200_000, "culture");

        let response = server(state)
            .get("/api/v1/tours")
            .add_query_param("category", "beach")
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["tours"][0]["category"], "beach");
    }

    #[tokio::test]
    async fn price_window_narrows_results() {
        let (state, _dir) = scratch_state();
        seed_tour(&state, "A", 100_000, "beach");
        seed_tour(&state, "B", 200_000, "beach");
        seed_tour(&state, "C", 300_000, "beach");

        let response = server(state)
            .get("/api/v1/tours")
            .add_query_param("priceMin", "150000")
            .add_query_param("priceMax", "250000")
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["tours"][0]["title"], "B");
    }

    #[tokio::test]
    async fn malformed_price_is_an_internal_error() {
        let (state, _dir) = scratch_state();
        let response = server(state)
            .get("/api/v1/tours")
            .add_query_param("priceMin", "abc")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Internal server error");
        assert!(body["message"].as_str().unwrap().contains("priceMin"));
    }

    #[tokio::test]
    async fn malformed_stars_is_an_internal_error() {
        let (state, _dir) = scratch_state();
        let response = server(state)
            .get("/api/v1/tours")
            .add_query_param("stars", "five")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn options_returns_empty_200_with_cors_headers() {
        let (state, _dir) = scratch_state();
        let response = server(state)
            .method(Method::OPTIONS, "/api/v1/tours")
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), "");
        assert_eq!(response.header("access-control-allow-origin"), "*");
        assert_eq!(response.header("access-control-max-age"), "86400");
    }

    #[tokio::test]
    async fn post_is_method_not_allowed() {
        let (state, _dir) = scratch_state();
        let response = server(state).post("/api/v1/tours").await;

        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn health_probes_respond() {
        let (state, _dir) = scratch_state();
        let server = server(state);

        server.get("/health/live").await.assert_status_ok();
        server.get("/health/ready").await.assert_status_ok();
    }
}
