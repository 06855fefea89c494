use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use elevation::{ElevationService, GeoCoordinate, InMemoryTile, TileFileReference};
use tempfile::TempDir;

const SRTM3_SAMPLES: usize = 1201;
const SRTM3_SIZE: usize = SRTM3_SAMPLES * SRTM3_SAMPLES * 2;

/// Create a synthetic 3" tile with a simple elevation gradient.
fn create_tile(dir: &std::path::Path, filename: &str) {
    let mut data = vec![0u8; SRTM3_SIZE];
    for row in 0..SRTM3_SAMPLES {
        for col in 0..SRTM3_SAMPLES {
            let elev = ((row + col) % 4000) as i16;
            let offset = (row * SRTM3_SAMPLES + col) * 2;
            data[offset..offset + 2].copy_from_slice(&elev.to_be_bytes());
        }
    }
    let path = dir.join(filename);
    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(&data).unwrap();
}

fn coords_in_tile(lat: f64, lon: f64, count: usize) -> Vec<GeoCoordinate> {
    (0..count)
        .map(|i| {
            let frac = i as f64 / count as f64;
            GeoCoordinate::new(lat + frac * 0.99, lon + frac * 0.99).unwrap()
        })
        .collect()
}

fn bench_single_point(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    create_tile(tmp.path(), "N54W004.hgt");
    let reference = TileFileReference::from_file(tmp.path().join("N54W004.hgt")).unwrap();
    let tile = InMemoryTile::load(&reference).unwrap();
    let target = GeoCoordinate::new(54.454225, -3.211586).unwrap();

    c.bench_function("single_point_file_read", |b| {
        b.iter(|| black_box(reference.elevation_at(black_box(&target)).unwrap()));
    });

    c.bench_function("single_point_in_memory", |b| {
        b.iter(|| black_box(tile.elevation_at(black_box(&target)).unwrap()));
    });
}

fn bench_tile_load(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    create_tile(tmp.path(), "N54W004.hgt");
    let reference = TileFileReference::from_file(tmp.path().join("N54W004.hgt")).unwrap();

    c.bench_function("in_memory_tile_load", |b| {
        b.iter(|| black_box(InMemoryTile::load(&reference).unwrap()));
    });
}

fn bench_batch_same_tile(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    create_tile(tmp.path(), "N54W004.hgt");
    let service = ElevationService::builder(tmp.path()).build().unwrap();
    let coords = coords_in_tile(54.0, -4.0, 1000);

    // Warm the cache
    let _ = service.elevations(&coords[..1]);

    c.bench_function("batch_1000_same_tile", |b| {
        b.iter(|| black_box(service.elevations(black_box(&coords)).unwrap()));
    });
}

fn bench_profile_multi_tile(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    create_tile(tmp.path(), "N54W004.hgt");
    create_tile(tmp.path(), "N55W004.hgt");
    create_tile(tmp.path(), "N54W003.hgt");
    let service = ElevationService::builder(tmp.path()).build().unwrap();

    let mut coords = coords_in_tile(54.0, -4.0, 334);
    coords.extend(coords_in_tile(55.0, -4.0, 333));
    coords.extend(coords_in_tile(54.0, -3.0, 333));

    // Warm the cache
    let _ = service.profile(&coords);

    c.bench_function("profile_1000_multi_tile", |b| {
        b.iter(|| black_box(service.profile(black_box(&coords)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_single_point,
    bench_tile_load,
    bench_batch_same_tile,
    bench_profile_multi_tile,
);
criterion_main!(benches);
