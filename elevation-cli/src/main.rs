use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// HGT elevation data CLI tool
#[derive(Parser)]
#[command(name = "elevation")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing .hgt files
    #[arg(short, long, env = "ELEVATION_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Maximum tile references in cache
    #[arg(
        short,
        long,
        env = "ELEVATION_CACHE_SIZE",
        default_value = "1000",
        global = true
    )]
    cache_size: u64,

    /// Log library activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query elevation for one or more coordinates
    Query {
        /// Pipe separated lat,lon pairs (e.g. "54.4,-3.2|54.5,-3.5")
        #[arg(allow_hyphen_values = true)]
        coordinates: String,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Elevation profile along a path, with cumulative distance
    Profile {
        /// Pipe separated lat,lon pairs, in path order
        #[arg(allow_hyphen_values = true)]
        coordinates: String,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add an elevation column to a CSV file
    Batch {
        /// Input CSV file
        input: PathBuf,

        /// Output file (defaults to <input>_elevation.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for latitude
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude
        #[arg(long, default_value = "lon")]
        lon_col: String,
    },

    /// Display information about a tile
    Info {
        /// Path to .hgt file, or tile name (e.g., N54W004)
        #[arg(required_unless_present_all = ["lat", "lon"])]
        tile: Option<String>,

        /// Specify tile by latitude instead of filename
        #[arg(long, conflicts_with = "tile", requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Specify tile by longitude instead of filename
        #[arg(long, conflicts_with = "tile", requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// List available tiles
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "elevation=debug,elevation_cli=debug".into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Query { coordinates, json } => {
            commands::query::run(cli.data_dir, cli.cache_size, &coordinates, json)
        }
        Commands::Profile { coordinates, json } => {
            commands::profile::run(cli.data_dir, cli.cache_size, &coordinates, json)
        }
        Commands::Batch {
            input,
            output,
            lat_col,
            lon_col,
        } => commands::batch::run(
            cli.data_dir,
            cli.cache_size,
            input,
            output,
            &lat_col,
            &lon_col,
        ),
        Commands::Info { tile, lat, lon } => commands::info::run(cli.data_dir, tile, lat, lon),
        Commands::List => commands::list::run(cli.data_dir),
    }
}
