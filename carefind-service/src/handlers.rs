//! HTTP request handlers for the hospital directory service.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use carefind::geojson::facilities_to_feature_collection;
use carefind::triage::{check_emergency, validate_symptoms, EMERGENCY_KEYWORDS};
use carefind::{DirectoryError, Facility, GeoPoint, RankedFacility};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::AppState;

/// A request number that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LenientNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl LenientNumber {
    /// Numeric value, or NaN when the input is not a number.
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
            Self::Other(_) => f64::NAN,
        }
    }

    /// Integer value truncated toward zero, or `None` when not numeric.
    pub fn to_i64(&self) -> Option<i64> {
        let n = self.to_f64();
        n.is_finite().then(|| n.trunc() as i64)
    }
}

/// Request body for the nearest-hospitals endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NearestRequest {
    /// Latitude in decimal degrees (-90 to 90).
    #[schema(value_type = f64, example = 28.6139)]
    pub latitude: Option<LenientNumber>,
    /// Longitude in decimal degrees (-180 to 180).
    #[schema(value_type = f64, example = 77.2090)]
    pub longitude: Option<LenientNumber>,
    /// Number of results (default 5, at most 20).
    #[schema(value_type = Option<i64>, example = 5)]
    pub limit: Option<LenientNumber>,
}

/// Request body for the within-radius endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RadiusRequest {
    /// Latitude in decimal degrees (-90 to 90).
    #[schema(value_type = f64, example = 28.6139)]
    pub latitude: Option<LenientNumber>,
    /// Longitude in decimal degrees (-180 to 180).
    #[schema(value_type = f64, example = 77.2090)]
    pub longitude: Option<LenientNumber>,
    /// Search radius in kilometers (default 50, at most 500).
    #[schema(value_type = Option<f64>, example = 50.0)]
    pub radius_km: Option<LenientNumber>,
}

/// Query parameters for listing endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring filter on the facility name.
    pub search: Option<String>,
}

/// Request body for the emergency keyword check.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EmergencyCheckRequest {
    /// Free-text symptom description.
    pub symptoms: Option<String>,
}

/// A point echoed back to the caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct LocationResponse {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeoPoint> for LocationResponse {
    fn from(point: GeoPoint) -> Self {
        Self {
            latitude: point.latitude(),
            longitude: point.longitude(),
        }
    }
}

/// A facility as listed by the directory.
#[derive(Debug, Serialize, ToSchema)]
pub struct HospitalResponse {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Facility> for HospitalResponse {
    fn from(f: Facility) -> Self {
        Self {
            name: f.name,
            address: f.address,
            latitude: f.latitude,
            longitude: f.longitude,
        }
    }
}

/// A facility with its distance from the query point.
#[derive(Debug, Serialize, ToSchema)]
pub struct RankedHospitalResponse {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Great-circle distance in kilometers, rounded to 2 decimals.
    pub distance_km: f64,
    /// Display form, e.g. "850 meters" or "4.2 km".
    pub distance_formatted: String,
}

impl From<RankedFacility> for RankedHospitalResponse {
    fn from(r: RankedFacility) -> Self {
        Self {
            name: r.facility.name,
            address: r.facility.address,
            latitude: r.facility.latitude,
            longitude: r.facility.longitude,
            distance_km: r.distance_km,
            distance_formatted: r.distance_formatted,
        }
    }
}

/// Nearest-hospitals response.
#[derive(Debug, Serialize, ToSchema)]
pub struct NearestResponse {
    pub user_location: LocationResponse,
    /// Number of hospitals returned.
    pub total_found: usize,
    /// Number of hospitals in the directory.
    pub total_available: usize,
    pub results: Vec<RankedHospitalResponse>,
}

/// Within-radius response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RadiusResponse {
    pub search_location: LocationResponse,
    /// Radius actually applied.
    pub radius_km: f64,
    pub count: usize,
    pub results: Vec<RankedHospitalResponse>,
}

/// Directory listing response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HospitalListResponse {
    pub total: usize,
    pub results: Vec<HospitalResponse>,
}

/// Directory size response.
#[derive(Debug, Serialize, ToSchema)]
pub struct CountResponse {
    pub total: usize,
    /// "loaded" or "empty".
    pub status: String,
}

/// Reload response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReloadResponse {
    pub message: String,
    /// Number of hospitals after the reload.
    pub total: usize,
}

/// Emergency keyword list.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmergencyKeywordsResponse {
    pub keywords: Vec<String>,
    pub message: String,
}

/// Result of the keyword emergency check.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmergencyCheckResponse {
    pub is_emergency: bool,
    pub message: String,
    pub disclaimer: String,
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Number of hospitals currently loaded.
    pub facilities_loaded: usize,
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Map a library error onto an HTTP response.
fn error_response(e: &DirectoryError) -> Response {
    let status = match e {
        DirectoryError::InvalidCoordinates { .. } | DirectoryError::InvalidRadius { .. } => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    tracing::warn!(error = %e, status = status.as_u16(), "Request failed");

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

fn rejection_response(rejection: JsonRejection) -> Response {
    tracing::warn!(error = %rejection, "Rejected request body");
    bad_request(rejection.body_text())
}

/// Both coordinates, or a 400 when either is missing.
fn required_point(
    latitude: Option<&LenientNumber>,
    longitude: Option<&LenientNumber>,
) -> Result<(f64, f64), Response> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => Ok((lat.to_f64(), lon.to_f64())),
        _ => Err(bad_request("Both latitude and longitude are required")),
    }
}

/// Find the hospitals nearest to a location.
///
/// # Returns
///
/// - `200 OK` with ranked hospitals, nearest first
/// - `400 Bad Request` if coordinates are missing or invalid
#[utoipa::path(
    post,
    path = "/api/nearest-hospitals",
    tag = "hospitals",
    request_body = NearestRequest,
    responses(
        (status = 200, description = "Nearest hospitals", body = NearestResponse),
        (status = 400, description = "Missing or invalid coordinates", body = ErrorResponse)
    )
)]
pub async fn post_nearest(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NearestRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    let (lat, lon) = match required_point(request.latitude.as_ref(), request.longitude.as_ref()) {
        Ok(point) => point,
        Err(response) => return response,
    };
    let limit = request.limit.as_ref().and_then(LenientNumber::to_i64);

    tracing::debug!(lat, lon, ?limit, "Nearest query");

    match state.directory.nearest(lat, lon, limit) {
        Ok(result) => {
            tracing::info!(
                lat,
                lon,
                found = result.total_found,
                available = result.total_available,
                "Nearest hospitals found"
            );
            Json(NearestResponse {
                user_location: result.user_location.into(),
                total_found: result.total_found,
                total_available: result.total_available,
                results: result.results.into_iter().map(Into::into).collect(),
            })
            .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Find every hospital within a radius of a location.
///
/// # Returns
///
/// - `200 OK` with matching hospitals, nearest first
/// - `400 Bad Request` if coordinates are missing or invalid, or the radius
///   is outside (0, 500] km
#[utoipa::path(
    post,
    path = "/api/hospitals/within-radius",
    tag = "hospitals",
    request_body = RadiusRequest,
    responses(
        (status = 200, description = "Hospitals within the radius", body = RadiusResponse),
        (status = 400, description = "Invalid coordinates or radius", body = ErrorResponse)
    )
)]
pub async fn post_within_radius(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RadiusRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    let (lat, lon) = match required_point(request.latitude.as_ref(), request.longitude.as_ref()) {
        Ok(point) => point,
        Err(response) => return response,
    };
    let radius_km = request.radius_km.as_ref().map(LenientNumber::to_f64);

    tracing::debug!(lat, lon, ?radius_km, "Radius query");

    match state.directory.within_radius(lat, lon, radius_km) {
        Ok(result) => {
            tracing::info!(
                lat,
                lon,
                radius_km = result.radius_km,
                count = result.count,
                "Hospitals within radius found"
            );
            Json(RadiusResponse {
                search_location: result.search_location.into(),
                radius_km: result.radius_km,
                count: result.count,
                results: result.results.into_iter().map(Into::into).collect(),
            })
            .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// List the directory, optionally filtered by name.
#[utoipa::path(
    get,
    path = "/api/hospitals/all",
    tag = "hospitals",
    params(ListQuery),
    responses(
        (status = 200, description = "Hospitals in directory order", body = HospitalListResponse)
    )
)]
pub async fn get_all(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<HospitalListResponse> {
    let listing = state.directory.list_all(query.search.as_deref());

    Json(HospitalListResponse {
        total: listing.total,
        results: listing.results.into_iter().map(Into::into).collect(),
    })
}

/// Number of loaded hospitals.
#[utoipa::path(
    get,
    path = "/api/hospitals/count",
    tag = "hospitals",
    responses(
        (status = 200, description = "Directory size and status", body = CountResponse)
    )
)]
pub async fn get_count(State(state): State<Arc<AppState>>) -> Json<CountResponse> {
    let count = state.directory.count();

    Json(CountResponse {
        total: count.total,
        status: count.status.as_str().to_string(),
    })
}

/// Re-read the directory from its source file.
///
/// A failed reload answers `500` and the previous directory keeps serving.
#[utoipa::path(
    post,
    path = "/api/hospitals/reload",
    tag = "hospitals",
    responses(
        (status = 200, description = "Directory reloaded", body = ReloadResponse),
        (status = 500, description = "Reload failed, previous directory kept", body = ErrorResponse)
    )
)]
pub async fn post_reload(State(state): State<Arc<AppState>>) -> Response {
    let reloaded = tokio::task::spawn_blocking(move || state.directory.reload()).await;

    match reloaded {
        Ok(Ok(total)) => Json(ReloadResponse {
            message: "Hospital data reloaded successfully".to_string(),
            total,
        })
        .into_response(),
        Ok(Err(e)) => error_response(&e),
        Err(e) => {
            tracing::error!(error = %e, "Reload task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to reload hospital data".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// The directory as a GeoJSON FeatureCollection of points.
#[utoipa::path(
    get,
    path = "/api/hospitals/geojson",
    tag = "hospitals",
    params(ListQuery),
    responses(
        (status = 200, description = "GeoJSON FeatureCollection of Point features")
    )
)]
pub async fn get_geojson(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<geojson::FeatureCollection> {
    let listing = state.directory.list_all(query.search.as_deref());
    Json(facilities_to_feature_collection(&listing.results))
}

/// Keywords that flag a description as an emergency.
#[utoipa::path(
    get,
    path = "/api/symptoms/emergency-keywords",
    tag = "symptoms",
    responses(
        (status = 200, description = "Emergency keywords", body = EmergencyKeywordsResponse)
    )
)]
pub async fn get_emergency_keywords() -> Json<EmergencyKeywordsResponse> {
    Json(EmergencyKeywordsResponse {
        keywords: EMERGENCY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        message: "If any of these symptoms are present, seek immediate medical attention"
            .to_string(),
    })
}

/// Keyword-only emergency check, without AI analysis.
#[utoipa::path(
    post,
    path = "/api/symptoms/check-emergency",
    tag = "symptoms",
    request_body = EmergencyCheckRequest,
    responses(
        (status = 200, description = "Check result", body = EmergencyCheckResponse),
        (status = 400, description = "Missing or oversized description", body = ErrorResponse)
    )
)]
pub async fn post_check_emergency(
    payload: Result<Json<EmergencyCheckRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    let symptoms = match validate_symptoms(request.symptoms.as_deref().unwrap_or_default()) {
        Ok(symptoms) => symptoms,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected symptom description");
            return bad_request(e.to_string());
        }
    };

    let check = check_emergency(symptoms);
    if check.is_emergency {
        tracing::warn!("Emergency keywords detected");
    }

    Json(EmergencyCheckResponse {
        is_emergency: check.is_emergency,
        message: check.message.to_string(),
        disclaimer: check.disclaimer.to_string(),
    })
    .into_response()
}

/// Health check endpoint.
///
/// Returns service status, version and the loaded directory size.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        facilities_loaded: state.directory.len(),
    })
}
