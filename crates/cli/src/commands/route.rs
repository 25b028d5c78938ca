//! Routing, ranking, fee and stop-ordering commands.
//!
//! # Usage
//!
//! ```bash
//! cf-cli route --from 10.9,106.7 --to 10.7626,106.6602 --vehicle motorbike
//! cf-cli nearest --facilities farms.json --customer 10.7626,106.6602 --road
//! cf-cli fee 12.5 --cap 50000
//! cf-cli optimize --start 10.7626,106.6602 --stops stops.json
//! ```
//!
//! # Environment Variables
//!
//! `route` and `nearest --road` call the routing provider configured by
//! `ROUTING_BASE_URL`.

use std::path::Path;

use clean_food_core::{Coordinate, DeliveryZone, Facility, VehicleProfile, Vnd};
use clean_food_delivery::fee::FeeSchedule;
use clean_food_delivery::locator::SearchMode;
use clean_food_delivery::optimizer::{self, DeliveryStop};
use clean_food_delivery::{DeliveryConfig, DeliveryEngine};
use serde_json::json;
use tracing::info;

use super::{CommandError, print_json, read_json};

/// Route between two points and print the route with its fee.
///
/// # Errors
///
/// Returns an error if configuration is invalid or routing fails.
pub async fn quote(
    from: Coordinate,
    to: Coordinate,
    vehicle: VehicleProfile,
) -> Result<(), CommandError> {
    let engine = DeliveryEngine::new(DeliveryConfig::from_env()?, Vec::<DeliveryZone>::new())?;
    let quote = engine.quote_between(from, to, vehicle).await?;

    info!(
        distance_km = quote.route.distance_km,
        duration_min = quote.route.duration_min,
        vehicle = vehicle.label(),
        "Route computed"
    );

    print_json(&quote)
}

/// Rank facilities from a file and print them nearest first.
///
/// `vehicle` selects road ranking; `None` ranks by straight line.
///
/// # Errors
///
/// Returns an error if the file cannot be read or configuration is invalid.
pub async fn nearest(
    facilities_path: &Path,
    customer: Coordinate,
    max_distance_km: f64,
    limit: usize,
    vehicle: Option<VehicleProfile>,
) -> Result<(), CommandError> {
    let facilities: Vec<Facility> = read_json(facilities_path)?;
    info!(facilities = facilities.len(), "Loaded facilities");

    let engine = DeliveryEngine::new(DeliveryConfig::from_env()?, Vec::<DeliveryZone>::new())?;
    let mode = vehicle.map_or(SearchMode::StraightLine, SearchMode::Road);
    let ranked = engine
        .find_nearest(&facilities, customer, max_distance_km, limit, mode)
        .await;

    print_json(&ranked)
}

/// Print the fee breakdown for a distance.
///
/// # Errors
///
/// Returns an error if configuration is invalid.
pub fn fee(distance_km: f64, cap: Option<i64>) -> Result<(), CommandError> {
    let config = DeliveryConfig::from_env()?;
    let schedule = FeeSchedule {
        cap: cap.map(Vnd::new),
        ..config.fees
    };
    let fee = schedule.compute(distance_km);

    print_json(&json!({
        "distance_km": distance_km,
        "fee": fee,
        "display": fee.total.to_string(),
    }))
}

/// Order stops from a file and print the route.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn optimize(start: Coordinate, stops_path: &Path) -> Result<(), CommandError> {
    let stops: Vec<DeliveryStop> = read_json(stops_path)?;
    let route = optimizer::optimize(start, &stops);

    info!(
        stops = route.num_stops(),
        total_distance_km = route.total_distance_km,
        "Route optimized"
    );

    print_json(&json!({
        "route": route.legs,
        "total_distance_km": route.total_distance_km,
        "num_stops": route.num_stops(),
    }))
}
