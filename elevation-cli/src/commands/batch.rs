use anyhow::{bail, Context, Result};
use elevation::{ElevationService, GeoCoordinate};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::build_service;

/// Coordinates resolved per service call.
const CHUNK_SIZE: usize = 1000;

pub fn run(
    data_dir: Option<PathBuf>,
    cache_size: u64,
    input: PathBuf,
    output: Option<PathBuf>,
    lat_col: &str,
    lon_col: &str,
) -> Result<()> {
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension != "csv" {
        bail!("Unsupported file format: {}. Use .csv", extension);
    }

    let service = build_service(data_dir, cache_size)?;

    let output_path = output.unwrap_or_else(|| default_output_path(&input));
    process_csv(&service, &input, &output_path, lat_col, lon_col)?;

    println!("Output written to: {}", output_path.display());
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_elevation.csv", stem))
}

/// Copy `input` to `output` with an `elevation` column appended.
///
/// Nothing is written if any row fails to parse or falls on a missing tile.
fn process_csv(
    service: &ElevationService,
    input: &Path,
    output: &Path,
    lat_col: &str,
    lon_col: &str,
) -> Result<()> {
    let file = File::open(input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers = reader.headers()?.clone();
    let lat_idx = headers
        .iter()
        .position(|h| h == lat_col)
        .with_context(|| format!("Column '{}' not found in CSV", lat_col))?;
    let lon_idx = headers
        .iter()
        .position(|h| h == lon_col)
        .with_context(|| format!("Column '{}' not found in CSV", lon_col))?;

    let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;

    let coords = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            // Header is line 1
            let line = i + 2;
            let lat = record
                .get(lat_idx)
                .with_context(|| format!("Missing latitude on line {}", line))?;
            let lon = record
                .get(lon_idx)
                .with_context(|| format!("Missing longitude on line {}", line))?;
            GeoCoordinate::try_parse(lat, lon)
                .with_context(|| format!("Invalid coordinate '{},{}' on line {}", lat, lon, line))
        })
        .collect::<Result<Vec<_>>>()?;

    let pb = ProgressBar::new(coords.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let mut elevations = Vec::with_capacity(coords.len());
    for chunk in coords.chunks(CHUNK_SIZE) {
        let points = service
            .elevations(chunk)
            .context("Failed to get elevation")?;
        elevations.extend(points.iter().map(|p| p.elevation().to_string()));
        pb.inc(chunk.len() as u64);
    }
    pb.finish_with_message("done");

    let output_file = File::create(output).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));

    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.push("elevation");
    writer.write_record(&new_headers)?;

    for (record, elevation) in records.iter().zip(&elevations) {
        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.push(elevation);
        writer.write_record(&new_record)?;
    }

    writer.flush()?;
    Ok(())
}
