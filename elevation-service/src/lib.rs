//! Elevation Service Library
//!
//! HTTP handlers and router for the HGT elevation service.
//! This library is used by both the elevation-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use elevation::ElevationService;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers.
pub struct AppState {
    /// Elevation service for point and profile queries.
    pub elevation_service: ElevationService,
}

/// OpenAPI documentation for the elevation service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Elevation Service",
        version = "0.1.0",
        description = "REST API for querying ground elevation from HGT terrain tiles.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::get_elevation,
        handlers::get_profile,
        handlers::health_check,
        handlers::get_stats,
    ),
    components(
        schemas(
            handlers::ElevationResponse,
            handlers::ProfilePointResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
            handlers::StatsResponse,
        )
    ),
    tags(
        (name = "elevation", description = "Elevation query endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Build the application router.
///
/// Routes:
///
/// - `GET /api/elevation/{coordinates}` - Elevation per coordinate
/// - `GET /api/elevation/profile/{coordinates}` - Elevation profile
/// - `GET /health` - Health check
/// - `GET /stats` - Cache statistics
/// - `GET /docs` - OpenAPI documentation (Swagger UI)
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/elevation/:coordinates", get(handlers::get_elevation))
        .route(
            "/api/elevation/profile/:coordinates",
            get(handlers::get_profile),
        )
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{
    ElevationResponse, ErrorResponse, HealthResponse, ProfilePointResponse, StatsResponse,
};
