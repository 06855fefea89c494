//! HTTP request handlers for the elevation service.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use elevation::{parse_coordinate_list, ElevationError, ElevationPoint, ElevationProfilePoint, ErrorKind};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppState;

/// Elevation at one coordinate.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ElevationResponse {
    /// Latitude queried.
    pub latitude: f64,
    /// Longitude queried.
    pub longitude: f64,
    /// Elevation in meters (nearest sample).
    pub elevation: i16,
}

impl From<&ElevationPoint> for ElevationResponse {
    fn from(point: &ElevationPoint) -> Self {
        Self {
            latitude: point.coordinate().latitude(),
            longitude: point.coordinate().longitude(),
            elevation: point.elevation(),
        }
    }
}

/// One point of an elevation profile.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfilePointResponse {
    /// Latitude queried.
    pub latitude: f64,
    /// Longitude queried.
    pub longitude: f64,
    /// Elevation in meters (nearest sample).
    pub elevation: i16,
    /// Distance from the first point of the profile, in meters.
    pub distance: f64,
}

impl From<&ElevationProfilePoint> for ProfilePointResponse {
    fn from(point: &ElevationProfilePoint) -> Self {
        Self {
            latitude: point.coordinate().latitude(),
            longitude: point.coordinate().longitude(),
            elevation: point.elevation(),
            distance: point.distance(),
        }
    }
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
}

/// Cache statistics response.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Number of tile references in cache.
    pub cached_tiles: u64,
    /// Cache hit count.
    pub cache_hits: u64,
    /// Cache miss count.
    pub cache_misses: u64,
    /// Number of references loaded from disk.
    pub cache_loads: u64,
    /// Cache hit rate (0.0 to 1.0).
    pub hit_rate: f64,
}

/// Get the elevation for one or more coordinates.
///
/// # Path Parameters
///
/// - `coordinates`: pipe separated `lat,lon` pairs, e.g. `54.4,-3.2|54.5,-3.5`
///
/// # Returns
///
/// - `200 OK` with one elevation per coordinate, in input order
/// - `400 Bad Request` if a coordinate is malformed
/// - `404 Not Found` if any required tile is unavailable
#[utoipa::path(
    get,
    path = "/api/elevation/{coordinates}",
    params(
        ("coordinates" = String, Path, description = "Pipe separated lat,lon pairs, e.g. 54.4,-3.2|54.5,-3.5")
    ),
    responses(
        (status = 200, description = "Elevation per coordinate, in input order", body = [ElevationResponse]),
        (status = 400, description = "Malformed coordinate", body = ErrorResponse),
        (status = 404, description = "Tile data unavailable", body = ErrorResponse)
    ),
    tag = "elevation"
)]
#[axum::debug_handler]
pub async fn get_elevation(
    State(state): State<Arc<AppState>>,
    Path(coordinates): Path<String>,
) -> Response {
    let coords = match parse_coordinate_list(&coordinates) {
        Ok(coords) => coords,
        Err(e) => return error_response(&coordinates, e),
    };
    tracing::debug!(count = coords.len(), "Elevation query");

    let result =
        tokio::task::spawn_blocking(move || state.elevation_service.elevations(&coords)).await;

    match result {
        Ok(Ok(points)) => {
            tracing::info!(points = points.len(), "Elevations found");
            let body: Vec<ElevationResponse> = points.iter().map(ElevationResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(Err(e)) => error_response(&coordinates, e),
        Err(e) => internal_error(&coordinates, e),
    }
}

/// Get an elevation profile.
///
/// Each point carries the cumulative distance from the first coordinate,
/// with every segment rounded to the nearest meter.
#[utoipa::path(
    get,
    path = "/api/elevation/profile/{coordinates}",
    params(
        ("coordinates" = String, Path, description = "Pipe separated lat,lon pairs, e.g. 54.454225,-3.211586|54.5,-3.5")
    ),
    responses(
        (status = 200, description = "Profile points, in input order", body = [ProfilePointResponse]),
        (status = 400, description = "Malformed coordinate", body = ErrorResponse),
        (status = 404, description = "Tile data unavailable", body = ErrorResponse)
    ),
    tag = "elevation"
)]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(coordinates): Path<String>,
) -> Response {
    let coords = match parse_coordinate_list(&coordinates) {
        Ok(coords) => coords,
        Err(e) => return error_response(&coordinates, e),
    };
    tracing::debug!(count = coords.len(), "Profile query");

    let result =
        tokio::task::spawn_blocking(move || state.elevation_service.profile(&coords)).await;

    match result {
        Ok(Ok(profile)) => {
            tracing::info!(
                points = profile.len(),
                distance = profile.last().map(|p| p.distance()).unwrap_or(0.0),
                "Profile computed"
            );
            let body: Vec<ProfilePointResponse> =
                profile.iter().map(ProfilePointResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(Err(e)) => error_response(&coordinates, e),
        Err(e) => internal_error(&coordinates, e),
    }
}

/// Map a query error to a status code by its kind.
fn error_response(coordinates: &str, e: ElevationError) -> Response {
    let status = match e.kind() {
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    tracing::warn!(coordinates, error = %e, "Elevation query failed");

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

fn internal_error(coordinates: &str, e: tokio::task::JoinError) -> Response {
    tracing::error!(coordinates, error = %e, "Elevation task failed");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal error".to_string(),
        }),
    )
        .into_response()
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse)),
    tag = "system"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Get cache statistics.
///
/// Returns information about the tile reference cache.
#[utoipa::path(
    get,
    path = "/stats",
    responses((status = 200, description = "Cache statistics", body = StatsResponse)),
    tag = "system"
)]
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let stats = state.elevation_service.cache_stats();

    Json(StatsResponse {
        cached_tiles: stats.entry_count,
        cache_hits: stats.hit_count,
        cache_misses: stats.miss_count,
        cache_loads: stats.load_count,
        hit_rate: stats.hit_rate(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use elevation::GeoCoordinate;

    #[test]
    fn test_elevation_response_from_point() {
        let point = ElevationPoint::new(GeoCoordinate::new(54.4, -3.2).unwrap(), 978);
        let response = ElevationResponse::from(&point);

        assert_eq!(response.latitude, 54.4);
        assert_eq!(response.longitude, -3.2);
        assert_eq!(response.elevation, 978);
    }

    #[test]
    fn test_profile_response_serialize() {
        let point = ElevationProfilePoint::new(GeoCoordinate::new(54.5, -3.5).unwrap(), -2, 1500.0);
        let json = serde_json::to_string(&ProfilePointResponse::from(&point)).unwrap();

        assert!(json.contains("\"elevation\":-2"));
        assert!(json.contains("\"distance\":1500.0"));
        assert!(json.contains("\"latitude\":54.5"));
    }

    #[test]
    fn test_health_response_serialize() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("0.1.0"));
    }

    #[test]
    fn test_error_status_by_kind() {
        let bad = error_response(
            "x",
            ElevationError::InvalidCoordinateFormat {
                input: "x".to_string(),
            },
        );
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let missing = error_response("1,1", ElevationError::NoCoveringTile { lat: 1.0, lon: 1.0 });
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let format = error_response("1,1", ElevationError::InvalidFileSize { size: 3 });
        assert_eq!(format.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
