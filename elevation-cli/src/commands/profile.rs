use anyhow::{Context, Result};
use elevation::{parse_coordinate_list, ElevationProfilePoint};
use serde::Serialize;
use std::path::PathBuf;

use super::build_service;

#[derive(Serialize)]
struct ProfilePointResponse {
    latitude: f64,
    longitude: f64,
    elevation: i16,
    distance: f64,
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

pub fn run(data_dir: Option<PathBuf>, cache_size: u64, coordinates: &str, json: bool) -> Result<()> {
    let coords = parse_coordinate_list(coordinates).context("Invalid coordinates")?;
    let service = build_service(data_dir, cache_size)?;

    let profile = service
        .profile(&coords)
        .context("Failed to compute profile")?;

    if json {
        let response: Vec<ProfilePointResponse> =
            profile.iter().map(ProfilePointResponse::from).collect();
        println!("{}", serde_json::to_string(&response)?);
        return Ok(());
    }

    println!("{:>12} {:>13} {:>8} {:>10}", "LAT", "LON", "ELEV", "DISTANCE");
    for point in &profile {
        println!(
            "{:>12} {:>13} {:>7}m {:>9}m",
            point.coordinate().latitude(),
            point.coordinate().longitude(),
            point.elevation(),
            point.distance()
        );
    }

    Ok(())
}
