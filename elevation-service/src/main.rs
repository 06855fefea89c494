//! Elevation Service - HTTP front end for HGT elevation queries.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ELEVATION_DATA_DIR` | Directory containing .hgt files | Current directory |
//! | `ELEVATION_CACHE_SIZE` | Maximum cached tile references | 1000 |
//! | `ELEVATION_CACHE_IDLE_SECS` | Idle seconds before a reference is evicted | 60 |
//! | `ELEVATION_PORT` | HTTP server port | 8080 |
//! | `ELEVATION_PRELOAD` | `all`, or `min_lat,min_lon,max_lat,max_lon[;...]` | None |
//! | `RUST_LOG` | Log filter (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /api/elevation/{lat,lon|lat,lon...}` - Elevation per coordinate
//! - `GET /api/elevation/profile/{lat,lon|lat,lon...}` - Elevation profile
//! - `GET /health` - Health check
//! - `GET /stats` - Cache statistics
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use elevation::{BoundingBox, ElevationServiceBuilder};
use elevation_service::{router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "elevation_service=info,elevation=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("ELEVATION_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let elevation_service = match ElevationServiceBuilder::from_env() {
        Ok(builder) => builder.build()?,
        Err(_) => {
            tracing::warn!("ELEVATION_DATA_DIR not set, using current directory");
            ElevationServiceBuilder::new(".").build()?
        }
    };

    tracing::info!(
        data_dir = %elevation_service.data_dir().display(),
        cache_capacity = elevation_service.cache_capacity(),
        idle_timeout_secs = elevation_service.idle_timeout().as_secs(),
        port = port,
        "Starting elevation service"
    );

    if let Ok(preload_val) = std::env::var("ELEVATION_PRELOAD") {
        let bounds = parse_preload_bounds(&preload_val);
        let bounds_ref = bounds.as_deref();
        tracing::info!(
            bounds = ?bounds_ref.map(|b| b.len()),
            "Preloading tile references"
        );
        let stats = elevation_service.preload(bounds_ref);
        tracing::info!(
            tiles_loaded = stats.tiles_loaded,
            tiles_already_cached = stats.tiles_already_cached,
            tiles_failed = stats.tiles_failed,
            tiles_matched = stats.tiles_matched,
            elapsed_ms = stats.elapsed_ms,
            "Preload complete"
        );
    }

    let app = router(Arc::new(AppState { elevation_service }));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse `ELEVATION_PRELOAD` into bounding boxes.
///
/// `true`, `all` and `1` mean every tile (`None`). Otherwise the value is a
/// `;` separated list of `min_lat,min_lon,max_lat,max_lon` boxes. Malformed
/// boxes are skipped; if none parse, every tile is preloaded.
fn parse_preload_bounds(value: &str) -> Option<Vec<BoundingBox>> {
    let trimmed = value.trim();

    if matches!(trimmed.to_lowercase().as_str(), "true" | "all" | "1") {
        return None;
    }

    let boxes: Vec<BoundingBox> = trimmed
        .split(';')
        .filter_map(|bbox_str| {
            let parts: Vec<f64> = bbox_str
                .split(',')
                .filter_map(|s| s.trim().parse::<f64>().ok())
                .collect();
            match parts[..] {
                [min_lat, min_lon, max_lat, max_lon] => {
                    Some(BoundingBox::new(min_lat, min_lon, max_lat, max_lon))
                }
                _ => {
                    tracing::warn!(
                        bbox = bbox_str,
                        "Invalid bounding box, expected min_lat,min_lon,max_lat,max_lon"
                    );
                    None
                }
            }
        })
        .collect();

    if boxes.is_empty() {
        tracing::warn!(
            value = trimmed,
            "Could not parse ELEVATION_PRELOAD, preloading all tiles"
        );
        None
    } else {
        Some(boxes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preload_all_keywords() {
        assert!(parse_preload_bounds("all").is_none());
        assert!(parse_preload_bounds(" TRUE ").is_none());
        assert!(parse_preload_bounds("1").is_none());
    }

    #[test]
    fn test_preload_boxes() {
        let boxes = parse_preload_bounds("54,-4,55,-3;35,138,36,139").unwrap();
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].min_lat, 54.0);
        assert_eq!(boxes[1].max_lon, 139.0);
    }

    #[test]
    fn test_preload_skips_malformed_box() {
        let boxes = parse_preload_bounds("54,-4,55;35,138,36,139").unwrap();
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].min_lat, 35.0);
    }

    #[test]
    fn test_preload_garbage_means_all() {
        assert!(parse_preload_bounds("nonsense").is_none());
    }
}
