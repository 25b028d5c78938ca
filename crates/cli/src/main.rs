//! Clean Food CLI - Delivery engine diagnostics for operators.
//!
//! # Usage
//!
//! ```bash
//! # Road route and uncapped fee between two points
//! cf-cli route --from 10.9,106.7 --to 10.7626,106.6602 --vehicle motorbike
//!
//! # Nearest facilities by road, within 30 km
//! cf-cli nearest --facilities farms.json --customer 10.7626,106.6602 --road --max-km 30
//!
//! # Shipping fee for a distance
//! cf-cli fee 12.5 --cap 50000
//!
//! # Zone availability for a point
//! cf-cli zone 10.95,106.82 --zones zones.json
//!
//! # Assign an order to a facility
//! cf-cli assign --order order.json --facilities farms.json
//! ```
//!
//! Configuration comes from the environment (see `clean_food_delivery::config`).
//! Logs go to stderr; results are printed to stdout as JSON.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clean_food_core::{Coordinate, VehicleProfile};
use clean_food_delivery::locator::UNLIMITED_DISTANCE_KM;

mod commands;

#[derive(Parser)]
#[command(name = "cf-cli")]
#[command(author, version, about = "Clean Food delivery engine tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route between two points and price the delivery
    Route {
        /// Origin as `lat,lng`
        #[arg(long, allow_hyphen_values = true)]
        from: Coordinate,

        /// Destination as `lat,lng`
        #[arg(long, allow_hyphen_values = true)]
        to: Coordinate,

        /// Vehicle (`car`, `motorbike`, `bicycle`, `foot`)
        #[arg(long, default_value = "car")]
        vehicle: VehicleProfile,
    },
    /// Rank facilities by distance from a customer
    Nearest {
        /// JSON file with a list of facilities
        #[arg(long)]
        facilities: PathBuf,

        /// Customer location as `lat,lng`
        #[arg(long, allow_hyphen_values = true)]
        customer: Coordinate,

        /// Distance ceiling in km (99999 or more means unlimited)
        #[arg(long, default_value_t = UNLIMITED_DISTANCE_KM)]
        max_km: f64,

        /// Maximum number of facilities to return
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Rank by road distance instead of straight line
        #[arg(long)]
        road: bool,

        /// Vehicle used for road ranking
        #[arg(long, default_value = "car")]
        vehicle: VehicleProfile,
    },
    /// Compute the shipping fee for a distance
    Fee {
        /// Distance in km
        distance_km: f64,

        /// Fee cap in đồng (defaults to no cap)
        #[arg(long)]
        cap: Option<i64>,
    },
    /// Check whether a point can be served
    Zone {
        /// Point as `lat,lng`
        #[arg(allow_hyphen_values = true)]
        point: Coordinate,

        /// JSON file with a list of delivery zones
        #[arg(long)]
        zones: Option<PathBuf>,

        /// JSON boundary table to use instead of the built-in one
        #[arg(long)]
        boundaries: Option<PathBuf>,
    },
    /// Export bounded delivery zones as GeoJSON
    ZonesGeojson {
        /// JSON file with a list of delivery zones
        #[arg(long)]
        zones: PathBuf,

        /// JSON boundary table to use instead of the built-in one
        #[arg(long)]
        boundaries: Option<PathBuf>,
    },
    /// Order delivery stops by nearest neighbour
    Optimize {
        /// Start position as `lat,lng`
        #[arg(long, allow_hyphen_values = true)]
        start: Coordinate,

        /// JSON file with a list of stops
        #[arg(long)]
        stops: PathBuf,
    },
    /// Assign an order to the nearest facility
    Assign {
        /// JSON file with the order
        #[arg(long)]
        order: PathBuf,

        /// JSON file with a list of facilities
        #[arg(long)]
        facilities: PathBuf,

        /// JSON file with a list of delivery zones
        #[arg(long)]
        zones: Option<PathBuf>,

        /// Vehicle used for road ranking
        #[arg(long, default_value = "car")]
        vehicle: VehicleProfile,

        /// Re-run assignment even if the order already has a facility
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    // Logs to stderr so stdout stays valid JSON
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "clean_food_delivery=info,cf_cli=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Route { from, to, vehicle } => {
            commands::route::quote(from, to, vehicle).await?;
        }
        Commands::Nearest {
            facilities,
            customer,
            max_km,
            limit,
            road,
            vehicle,
        } => {
            commands::route::nearest(&facilities, customer, max_km, limit, road.then_some(vehicle))
                .await?;
        }
        Commands::Fee { distance_km, cap } => commands::route::fee(distance_km, cap)?,
        Commands::Zone {
            point,
            zones,
            boundaries,
        } => commands::zones::check(point, zones.as_deref(), boundaries.as_deref())?,
        Commands::ZonesGeojson { zones, boundaries } => {
            commands::zones::geojson(&zones, boundaries.as_deref())?;
        }
        Commands::Optimize { start, stops } => commands::route::optimize(start, &stops)?,
        Commands::Assign {
            order,
            facilities,
            zones,
            vehicle,
            force,
        } => {
            commands::assign::run(&order, &facilities, zones.as_deref(), vehicle, force).await?;
        }
    }
    Ok(())
}
