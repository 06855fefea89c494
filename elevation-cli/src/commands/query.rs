use anyhow::{Context, Result};
use elevation::{parse_coordinate_list, ElevationPoint};
use serde::Serialize;
use std::path::PathBuf;

use super::build_service;

#[derive(Serialize)]
struct ElevationResponse {
    latitude: f64,
    longitude: f64,
    elevation: i16,
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

pub fn run(data_dir: Option<PathBuf>, cache_size: u64, coordinates: &str, json: bool) -> Result<()> {
    let coords = parse_coordinate_list(coordinates).context("Invalid coordinates")?;
    let service = build_service(data_dir, cache_size)?;

    let points = service
        .elevations(&coords)
        .context("Failed to get elevation")?;

    if json {
        let response: Vec<ElevationResponse> = points.iter().map(ElevationResponse::from).collect();
        println!("{}", serde_json::to_string(&response)?);
    } else {
        for point in &points {
            println!("{}", point.elevation());
        }
    }

    Ok(())
}
