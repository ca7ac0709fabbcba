//! Command line interface.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "soviet-atlas")]
#[command(about = "Census enrichment and map server for post-Soviet communities in Israel")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge census percentages into the statistical-area GeoJSON and
    /// rank the top areas per metric
    Enrich {
        /// Census CSV with per-area origin and birth-country percentages
        #[arg(long, default_value = "data/census_stat_areas.csv")]
        census: PathBuf,

        /// Statistical-area GeoJSON, enriched in place
        #[arg(long, default_value = "statistical_areas_2022/statistical_areas.geojson")]
        geojson: PathBuf,

        /// Output path for the ranked-areas JSON
        #[arg(long, default_value = "data/top_areas.json")]
        top_areas: PathBuf,
    },

    /// Serve the map client and data files with byte-range support
    Serve {
        /// Directory to serve files from
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Address to listen on
        #[arg(long, env = "ATLAS_LISTEN", default_value = "0.0.0.0:8080")]
        listen: SocketAddr,
    },
}
