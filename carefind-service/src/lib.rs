//! carefind Service Library
//!
//! HTTP handlers and router for the hospital directory service.
//! This library is used by both the carefind-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use carefind::FacilityDirectory;

/// Application state shared across handlers.
pub struct AppState {
    /// Loaded facility directory.
    pub directory: FacilityDirectory,
}

/// Build the API router without middleware layers or documentation routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/nearest-hospitals", post(handlers::post_nearest))
        .route(
            "/api/hospitals/within-radius",
            post(handlers::post_within_radius),
        )
        .route("/api/hospitals/all", get(handlers::get_all))
        .route("/api/hospitals/count", get(handlers::get_count))
        .route("/api/hospitals/reload", post(handlers::post_reload))
        .route("/api/hospitals/geojson", get(handlers::get_geojson))
        .route(
            "/api/symptoms/emergency-keywords",
            get(handlers::get_emergency_keywords),
        )
        .route(
            "/api/symptoms/check-emergency",
            post(handlers::post_check_emergency),
        )
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{
    CountResponse, EmergencyCheckRequest, EmergencyCheckResponse, EmergencyKeywordsResponse,
    ErrorResponse, HealthResponse, HospitalListResponse, HospitalResponse, LocationResponse,
    NearestRequest, NearestResponse, RadiusRequest, RadiusResponse, RankedHospitalResponse,
    ReloadResponse,
};
