use anyhow::Result;
use elevation::{filename, TileResolution};
use std::fs;
use std::path::PathBuf;

use super::{coverage, data_dir_or_env, format_size};

pub fn run(data_dir: Option<PathBuf>) -> Result<()> {
    let dir = data_dir_or_env(data_dir)?;

    if !dir.is_dir() {
        anyhow::bail!("Data directory does not exist: {}", dir.display());
    }

    let mut tiles: Vec<String> = fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".hgt"))
        .collect();

    if tiles.is_empty() {
        println!("No .hgt files found in: {}", dir.display());
        return Ok(());
    }

    tiles.sort();

    let mut one_arc_count = 0;
    let mut three_arc_count = 0;
    let mut unknown_count = 0;
    let mut total_size: u64 = 0;

    println!("{:<12} {:>8} {:>28}", "TILE", "TYPE", "COVERAGE");
    println!("{}", "-".repeat(50));

    for name in &tiles {
        let size = fs::metadata(dir.join(name)).map(|m| m.len()).unwrap_or(0);
        total_size += size;

        let resolution = match TileResolution::from_file_size(size) {
            Ok(TileResolution::OneArcSecond) => {
                one_arc_count += 1;
                "1\""
            }
            Ok(TileResolution::ThreeArcSecond) => {
                three_arc_count += 1;
                "3\""
            }
            Err(_) => {
                unknown_count += 1;
                "???"
            }
        };

        let coverage = match filename::coordinate_for(name) {
            Ok(corner) => coverage(corner.latitude() as i32, corner.longitude() as i32),
            Err(_) => "Unknown".to_string(),
        };

        println!("{:<12} {:>8} {:>28}", name, resolution, coverage);
    }

    println!();
    println!("Summary:");
    println!("  Total tiles: {}", tiles.len());
    if one_arc_count > 0 {
        println!("  1 arc-second (30m): {}", one_arc_count);
    }
    if three_arc_count > 0 {
        println!("  3 arc-second (90m): {}", three_arc_count);
    }
    if unknown_count > 0 {
        println!("  Unknown: {}", unknown_count);
    }
    println!("  Total size: {}", format_size(total_size));
    println!("  Data directory: {}", dir.display());

    Ok(())
}
