use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use soviet_atlas::cli::{Cli, Commands};
use soviet_atlas::{enrich, load, rank, report, serve};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Enrich {
            census,
            geojson,
            top_areas,
        } => run_enrich(&census, &geojson, &top_areas),
        Commands::Serve { root, listen } => serve::serve(root, listen).await,
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("soviet_atlas=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("soviet_atlas=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_enrich(census: &Path, geojson: &Path, top_areas: &Path) -> Result<()> {
    let stats = load::load_census(census)?;
    println!("Processed {} census rows", stats.len());

    let mut collection = enrich::read_collection(geojson)?;
    let matched = enrich::merge_features(&mut collection, &stats);
    enrich::write_collection(geojson, &collection)?;
    println!("Matched {matched} features in GeoJSON");

    let top = rank::rank_features(&collection);
    rank::write_top_areas(top_areas, &top)?;
    println!("Saved top areas to {}", top_areas.display());

    report::print_country_stats(&stats);
    Ok(())
}
