//! Tour booking intake HTTP microservice.
//!
//! Accepts booking submissions from the website, persists them, and
//! returns a confirmation with a customer-facing booking number.
//! Validation runs strictly before any store access; the referenced tour
//! is looked up only for display and may not exist.
//!
//! # Endpoints
//!
//! - `POST /api/v1/bookings` - Submit a booking
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
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use tourflow_lib::{BookingConfirmation, BookingRequest, TourSummary};
use tourflow_service_shared::{
    cors_layer, generate_request_id, health_live, health_ready, init_logging, preflight, ApiError,
    AppState, LoggingConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("booking");
    init_logging(&logging_config);

    let state = AppState::from_env();
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    info!(db_path = %state.db_path().display(), port, "starting booking service");

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
            "/api/v1/bookings",
            post(create_booking)
                .options(booking_preflight)
                .fallback(method_not_allowed),
        )
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Handle POST /api/v1/bookings requests.
async fn create_booking(
    State(state): State<AppState>,
    body: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingConfirmation>, ApiError> {
    let request_id = generate_request_id();

    // A body that does not parse as JSON is an internal error, not a
    // validation failure; only the required-field check gets a 400.
    let Json(request) = body.map_err(|rejection| {
        error!(request_id = %request_id, error = %rejection, "unreadable booking body");
        ApiError::internal(rejection.to_string())
    })?;

    info!(
        request_id = %request_id,
        tour_id = ?request.tour_id,
        "handling booking submission"
    );

    let record = request.validate().map_err(|e| {
        info!(request_id = %request_id, error = %e, "rejecting incomplete submission");
        ApiError::from_lib_error(&e)
    })?;

    let store = state.open_store().map_err(|e| {
        error!(request_id = %request_id, error = %e, "failed to open store");
        ApiError::from_lib_error(&e)
    })?;

    let booking_id = store.insert_booking(&record).map_err(|e| {
        error!(request_id = %request_id, error = %e, "booking insert failed");
        ApiError::from_lib_error(&e)
    })?;

    // Display lookup only: an unknown tour still books, with placeholders.
    let tour = match store.tour_summary(record.tour_id) {
        Ok(Some(summary)) => summary,
        Ok(None) => {
            warn!(
                request_id = %request_id,
                tour_id = record.tour_id,
                "booked tour not found, using placeholder summary"
            );
            TourSummary::placeholder()
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "tour lookup failed");
            return Err(ApiError::from_lib_error(&e));
        }
    };

    let confirmation = BookingConfirmation::new(booking_id, tour, &record);

    info!(
        request_id = %request_id,
        booking_number = %confirmation.booking_number,
        "booking created"
    );

    Ok(Json(confirmation))
}

async fn booking_preflight() -> axum::response::Response {
    preflight("POST, OPTIONS")
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};
    use axum_test::TestServer;
    use serde_json::json;
    use tourflow_service_shared::test_utils::{scratch_state, seed_tour};

    fn server(state: AppState) -> TestServer {
        TestServer::new(app(state)).expect("test server")
    }

    #[tokio::test]
    async fn first_booking_gets_bk000001() {
        let (state, _dir) = scratch_state();
        let response = server(state)
            .post("/api/v1/bookings")
            .json(&json!({
                "tourId": 1,
                "name": "Anna",
                "email": "a@x.com",
                "phone": "+1",
                "tourists": "2 people"
            }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["bookingNumber"], "BK000001");
        assert_eq!(body["bookingId"], 1);
        assert_eq!(body["customer"]["name"], "Anna");
        assert!(body["message"].as_str().unwrap().contains("BK000001"));
    }

    #[tokio::test]
    async fn booking_numbers_increase_across_submissions() {
        let (state, _dir) = scratch_state();
        let server = server(state);
        let submission = json!({
            "tourId": 1,
            "name": "Anna",
            "email": "a@x.com",
            "phone": "+1"
        });

        for expected in ["BK000001", "BK000002", "BK000003"] {
            let response = server.post("/api/v1/bookings").json(&submission).await;
            response.assert_status_ok();
            let body: serde_json::Value = response.json();
            assert_eq!(body["bookingNumber"], expected);
        }
    }

    #[tokio::test]
    async fn missing_fields_get_400_and_persist_nothing() {
        let (state, _dir) = scratch_state();
        let response = server(state.clone())
            .post("/api/v1/bookings")
            .json(&json!({"tourId": 1, "name": "Anna"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Missing required fields");
        assert_eq!(
            body["required"],
            json!(["tourId", "name", "email", "phone"])
        );

        let store = state.open_store().unwrap();
        assert_eq!(store.count_bookings().unwrap(), 0);
    }

    #[tokio::test]
    async fn whitespace_only_fields_count_as_missing() {
        let (state, _dir) = scratch_state();
        let response = server(state)
            .post("/api/v1/bookings")
            .json(&json!({
                "tourId": 1,
                "name": "   ",
                "email": "a@x.com",
                "phone": "+1"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn known_tour_appears_in_the_confirmation() {
        let (state, _dir) = scratch_state();
        let tour_id = seed_tour(&state, "Турция Анталия 5★", 142_000, "beach");

        let response = server(state)
            .post("/api/v1/bookings")
            .json(&json!({
                "tourId": tour_id,
                "name": "Anna",
                "email": "a@x.com",
                "phone": "+1"
            }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["tour"]["title"], "Турция Анталия 5★");
        assert_eq!(body["tour"]["price"], "142 000 ₽");
    }

    #[tokio::test]
    async fn unknown_tour_books_with_placeholder() {
        let (state, _dir) = scratch_state();
        let response = server(state)
            .post("/api/v1/bookings")
            .json(&json!({
                "tourId": 999,
                "name": "Anna",
                "email": "a@x.com",
                "phone": "+1"
            }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["tour"]["title"], "Тур");
        assert_eq!(body["tour"]["destination"], "");
    }

    #[tokio::test]
    async fn unreadable_body_is_an_internal_error() {
        let (state, _dir) = scratch_state();
        let response = server(state)
            .post("/api/v1/bookings")
            .text("{not json")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn get_is_method_not_allowed() {
        let (state, _dir) = scratch_state();
        let response = server(state).get("/api/v1/bookings").await;

        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn options_returns_empty_200_with_cors_headers() {
        let (state, _dir) = scratch_state();
        let response = server(state)
            .method(Method::OPTIONS, "/api/v1/bookings")
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), "");
        assert_eq!(response.header("access-control-allow-origin"), "*");
        assert_eq!(response.header("access-control-allow-methods"), "POST, OPTIONS");
    }
}
