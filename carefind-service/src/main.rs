//! carefind Service - HTTP microservice for nearest-hospital queries.
//!
//! A REST API over an in-memory hospital directory loaded from CSV.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CAREFIND_DIRECTORY` | Path to the hospital directory CSV | `./hospital_directory.csv` |
//! | `CAREFIND_DEFAULT_LIMIT` | Default number of nearest results | 5 |
//! | `CAREFIND_MAX_LIMIT` | Largest number of nearest results | 20 |
//! | `CAREFIND_DEFAULT_RADIUS_KM` | Default search radius | 50 |
//! | `CAREFIND_MAX_RADIUS_KM` | Largest accepted search radius | 500 |
//! | `CAREFIND_PORT` | HTTP server port | 3000 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `POST /api/nearest-hospitals` - Nearest hospitals to a location
//! - `POST /api/hospitals/within-radius` - Hospitals within a radius
//! - `GET /api/hospitals/all?search=` - List or search the directory
//! - `GET /api/hospitals/count` - Directory size
//! - `POST /api/hospitals/reload` - Re-read the directory file
//! - `GET /api/hospitals/geojson?search=` - Directory as GeoJSON
//! - `GET /api/symptoms/emergency-keywords` - Emergency keyword list
//! - `POST /api/symptoms/check-emergency` - Keyword emergency check
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use carefind::{FacilityDirectoryBuilder, QueryLimits};
use carefind_service::{handlers, router, AppState};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Directory file used when `CAREFIND_DIRECTORY` is not set.
const DEFAULT_DIRECTORY: &str = "hospital_directory.csv";

/// OpenAPI documentation for the carefind service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "carefind Hospital Directory Service",
        version = "0.1.0",
        description = "REST API for finding the nearest hospitals to a location.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::post_nearest,
        handlers::post_within_radius,
        handlers::get_all,
        handlers::get_count,
        handlers::post_reload,
        handlers::get_geojson,
        handlers::get_emergency_keywords,
        handlers::post_check_emergency,
        handlers::health_check,
    ),
    components(
        schemas(
            handlers::NearestRequest,
            handlers::RadiusRequest,
            handlers::EmergencyCheckRequest,
            handlers::LocationResponse,
            handlers::HospitalResponse,
            handlers::RankedHospitalResponse,
            handlers::NearestResponse,
            handlers::RadiusResponse,
            handlers::HospitalListResponse,
            handlers::CountResponse,
            handlers::ReloadResponse,
            handlers::EmergencyKeywordsResponse,
            handlers::EmergencyCheckResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "hospitals", description = "Hospital directory endpoints"),
        (name = "symptoms", description = "Symptom screening helpers"),
        (name = "system", description = "System and health endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carefind_service=info,carefind=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("CAREFIND_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);

    // The library reads CAREFIND_DIRECTORY and the query limit variables.
    // Startup load failures are fatal.
    let directory = match FacilityDirectoryBuilder::from_env() {
        Ok(builder) => builder.build()?,
        Err(_) => {
            tracing::warn!(
                path = DEFAULT_DIRECTORY,
                "CAREFIND_DIRECTORY not set, using default directory file"
            );
            FacilityDirectoryBuilder::new(DEFAULT_DIRECTORY)
                .limits(QueryLimits::from_env())
                .build()?
        }
    };

    let stats = directory.load_stats();
    tracing::info!(
        source = %directory.source().display(),
        facilities = directory.len(),
        skipped = stats.skipped(),
        port = port,
        "Starting carefind service"
    );

    let state = Arc::new(AppState { directory });

    let app = router(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
