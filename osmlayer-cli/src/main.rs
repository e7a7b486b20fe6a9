//! OsmLayer CLI - Command-line interface
//!
//! Tools around the osmlayer library: inspect OSM XML documents, preview how
//! a bbox splits into request tiles, and run an Overpass layer against a bbox.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use osmlayer::config::ConfigFile;
use osmlayer::coord::GeoBounds;
use osmlayer::logging::init_logging;
use osmlayer::tiling::REQUEST_ZOOM;
use tracing::warn;

use commands::common::parse_bbox;
use commands::config::ConfigCommands;
use error::CliError;

#[derive(Parser)]
#[command(name = "osmlayer")]
#[command(version, long_about = None)]
#[command(about = "Overpass viewport layer and OSM feature graph tools")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an OSM XML file and list its features
    Parse {
        /// OSM XML file
        file: PathBuf,

        /// Comma separated tag keys that make a closed way an area
        #[arg(long, value_delimiter = ',')]
        area_tags: Option<Vec<String>>,
    },

    /// Show the request tiles covering a bbox
    Tiles {
        /// Bounding box as south,west,north,east
        #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
        bbox: GeoBounds,

        /// Tile zoom level
        #[arg(long, default_value_t = REQUEST_ZOOM)]
        zoom: u8,
    },

    /// Load Overpass data for a bbox as a map view at the given zoom would
    Query {
        /// Bounding box as south,west,north,east
        #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
        bbox: GeoBounds,

        /// Map zoom level, compared against the minimum zoom
        #[arg(long, default_value_t = 16)]
        zoom: u8,

        /// Overpass query; BBOX is replaced by each tile's bounds
        #[arg(long)]
        query: Option<String>,

        /// Overpass API endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// Zoom level below which nothing is loaded
        #[arg(long)]
        min_zoom: Option<u8>,
    },

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    // Logging is not up yet, so a bad config file is reported after init
    let (config_file, config_error) = match ConfigFile::load() {
        Ok(file) => (file, None),
        Err(e) => (ConfigFile::default(), Some(e)),
    };
    let config = config_file.to_layer_config();

    let _guard = match init_logging(cli.debug || config.debug, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", CliError::from(e));
            process::exit(1);
        }
    };
    if let Some(e) = config_error {
        warn!(error = %e, "Ignoring configuration file");
    }

    let result = match cli.command {
        Commands::Parse { file, area_tags } => commands::parse::run(&file, area_tags, &config),
        Commands::Tiles { bbox, zoom } => commands::tiles::run(&bbox, zoom),
        Commands::Query {
            bbox,
            zoom,
            query,
            endpoint,
            min_zoom,
        } => {
            let debug = config.debug || cli.debug;
            let mut config = config.with_debug(debug);
            if let Some(query) = query {
                config = config.with_query(query);
            }
            if let Some(endpoint) = endpoint {
                config = config.with_endpoint(endpoint);
            }
            if let Some(min_zoom) = min_zoom {
                config = config.with_min_zoom(min_zoom);
            }
            commands::query::run(bbox, zoom, config)
        }
        Commands::Config(command) => commands::config::run(command, &config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
