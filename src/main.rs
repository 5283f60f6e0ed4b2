use clap::Parser;
use geopix::config::ApiKeys;
use geopix::geocode::Geocoder;
use geopix::map;
use geopix::photos::{Aggregator, ProviderReport};
use std::path::PathBuf;

/// Search physical locations for geotagged photos.
///
/// Geocodes a street address, queries FourSquare, Flickr, and Twitter for
/// photos taken within the search radius, and writes an interactive map of
/// everything it finds.
///
/// Examples:
///   geopix -a "350 5th Ave" -c "New York" -s NY
///   geopix -a "1 Infinite Loop" -c Cupertino -s CA -d 250 -o cupertino.html
#[derive(Parser)]
#[command(name = "geopix", version, about, long_about = None)]
struct Cli {
    /// Street address.
    #[arg(short = 'a', long)]
    address: String,

    /// City.
    #[arg(short = 'c', long)]
    city: String,

    /// State or region code (ex. OH).
    #[arg(short = 's', long)]
    state: String,

    /// Distance, in meters, to search from the address.
    #[arg(short = 'd', long, default_value_t = 500)]
    distance: u32,

    /// Name of the output file.
    #[arg(short = 'o', long, default_value = "geopix_map.html")]
    output: PathBuf,

    /// API keys file (defaults to ./api_keys.toml, then ~/.geopix/api_keys.toml).
    #[arg(long)]
    keys: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let keys = ApiKeys::load(cli.keys.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    // A failed geocode is fatal: no center, no search.
    let address = format!("{}, {}, {}", cli.address, cli.city, cli.state);
    let center = Geocoder::new().lookup(&address).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    eprintln!(
        "Looking for images within {} meters of {}",
        cli.distance, address
    );

    let radius = f64::from(cli.distance);
    let report = Aggregator::from_keys(&keys).run(&center, radius);

    for (provider, outcome) in report.iter() {
        match outcome {
            ProviderReport::NotConfigured => {
                eprintln!("  {}: no API keys in config, skipped", provider)
            }
            ProviderReport::Unavailable(reason) => {
                eprintln!("  {}: unavailable ({})", provider, reason)
            }
            ProviderReport::Collected(groups) if groups.is_empty() => {
                eprintln!("  {}: no geotagged photos found", provider)
            }
            ProviderReport::Collected(groups) => eprintln!(
                "  {}: {} photos at {} locations",
                provider,
                outcome.photo_count(),
                groups.len()
            ),
        }
    }

    if !report.has_photos() {
        eprintln!("Nothing to plot; map not written.");
        return;
    }

    let html = map::render(&center, radius, &report, &keys.mapbox);
    if let Err(e) = std::fs::write(&cli.output, html) {
        eprintln!("Error: cannot write {}: {}", cli.output.display(), e);
        std::process::exit(1);
    }
    eprintln!("Map written to {}", cli.output.display());
}
