//! Basic example demonstrating elevation library usage.
//!
//! Run with: cargo run --example basic -- /path/to/hgt/files

use elevation::{parse_coordinate_list, ElevationError, ElevationService, ErrorKind};
use std::env;

fn main() -> Result<(), ElevationError> {
    // Get data directory from command line
    let data_dir = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/hgt/files");
        std::process::exit(1);
    });

    let service = ElevationService::builder(&data_dir).build()?;

    // Scafell Pike to Great End, Lake District
    let route = parse_coordinate_list("54.454225,-3.211586|54.4588,-3.2039|54.4637,-3.1940")?;

    match service.profile(&route) {
        Ok(profile) => {
            println!("{:>12} {:>12} {:>8} {:>10}", "LAT", "LON", "ELEV", "DISTANCE");
            for point in &profile {
                println!(
                    "{:>12} {:>12} {:>7}m {:>9}m",
                    point.coordinate().latitude(),
                    point.coordinate().longitude(),
                    point.elevation(),
                    point.distance()
                );
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            println!("tile not available locally: {}", e);
        }
        Err(e) => return Err(e),
    }

    // Show cache statistics
    let stats = service.cache_stats();
    println!("\nCache statistics:");
    println!("  Cached references: {}", stats.entry_count);
    println!("  Hits: {}", stats.hit_count);
    println!("  Misses: {}", stats.miss_count);
    println!("  Hit rate: {:.1}%", stats.hit_rate() * 100.0);

    Ok(())
}
