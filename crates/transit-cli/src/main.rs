//! Batch entry point: loads TLEs from local files and prints the resulting
//! event list as JSON. No network access; `FileTleSource` is the only
//! TLE collaborator wired up here.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use transit_core::{
    FileTleSource, GridElevationMode, Observer, QueryParams, SatelliteInput, SearchMode,
    TleSource,
};

/// Find Sun/Moon transits and near-passes for a set of satellites.
#[derive(Parser, Debug)]
#[command(name = "transit-cli", version, about)]
struct Args {
    /// Observer latitude, degrees north.
    #[arg(long)]
    lat: f64,

    /// Observer longitude, degrees east.
    #[arg(long)]
    lon: f64,

    /// Observer elevation, meters above the WGS-84 ellipsoid.
    #[arg(long, default_value_t = 0.0)]
    elev_m: f64,

    /// Query window length, days.
    #[arg(long, default_value_t = 10.0)]
    days: f64,

    /// Window start, RFC3339 UTC. Defaults to now.
    #[arg(long)]
    start: Option<String>,

    /// Satellite designators, comma-separated; each must have a
    /// `<designator>.tle` file in `--tle-dir`.
    #[arg(long, value_delimiter = ',')]
    satellites: Vec<String>,

    /// Directory containing `<designator>.tle` files.
    #[arg(long, default_value = "tle")]
    tle_dir: String,

    /// Search radius for reachable/grid passes, km. 0 disables.
    #[arg(long, default_value_t = 0.0)]
    max_distance_km: f64,

    /// Use the full radial grid search instead of the fast parallax
    /// approximation.
    #[arg(long)]
    grid: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let start: DateTime<Utc> = match &args.start {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .context("parsing --start as RFC3339")?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let observer = Observer {
        lat_deg: args.lat,
        lon_deg: args.lon,
        elev_m: args.elev_m,
    };

    let mut params = QueryParams::new(observer, start, args.days);
    params.max_distance_km = args.max_distance_km;
    params.search_mode = if args.grid { SearchMode::Grid } else { SearchMode::Fast };
    params.grid_elev_mode = GridElevationMode::Base;

    let tle_source = FileTleSource::new(&args.tle_dir);
    for designator in &args.satellites {
        let (tle_line1, tle_line2) = tle_source
            .fetch(designator)
            .with_context(|| format!("loading TLE for {designator}"))?;
        params.satellites.push(SatelliteInput {
            name: designator.clone(),
            tle_line1,
            tle_line2,
            dimension_m: None,
        });
    }

    tracing::info!(satellites = params.satellites.len(), days = args.days, "starting query");

    let outcome = transit_core::run_query(&params);

    for (satellite, error) in &outcome.errors {
        tracing::warn!(satellite, %error, "satellite query failed");
    }

    println!("{}", serde_json::to_string_pretty(&outcome.events)?);

    Ok(())
}
