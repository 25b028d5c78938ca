//! Order assignment command.
//!
//! # Usage
//!
//! ```bash
//! cf-cli assign --order order.json --facilities farms.json --zones zones.json
//!
//! # Re-run for an order that already has a facility
//! cf-cli assign --order order.json --facilities farms.json --force
//! ```
//!
//! Prints the updated order, the method used and, for fallbacks and
//! unassigned orders, the reason.

use std::path::Path;

use clean_food_core::{Facility, Order, VehicleProfile};
use clean_food_delivery::assignment::AssignmentOutcome;
use clean_food_delivery::{DeliveryConfig, DeliveryEngine};
use serde_json::{Value, json};
use tracing::warn;

use super::{CommandError, print_json, read_json, zones};

/// Assign the order in `order_path` and print the result.
///
/// # Errors
///
/// Returns an error if an input file or the configuration is invalid.
pub async fn run(
    order_path: &Path,
    facilities_path: &Path,
    zones_path: Option<&Path>,
    vehicle: VehicleProfile,
    force: bool,
) -> Result<(), CommandError> {
    let mut order: Order = read_json(order_path)?;
    let facilities: Vec<Facility> = read_json(facilities_path)?;

    let config = DeliveryConfig::from_env()?;
    let checker = zones::load_checker(&config, zones_path, None)?;
    let engine = DeliveryEngine::with_zone_checker(config, checker)?;
    let assigner = engine.assigner(vehicle);

    let outcome = if force {
        Some(assigner.reassign_order(&mut order, &facilities).await)
    } else {
        assigner.assign_order(&mut order, &facilities).await
    };

    let Some(outcome) = outcome else {
        warn!(order_id = %order.id, "Order already assigned; pass --force to re-run");
        return print_json(&json!({ "order": order, "skipped": true }));
    };

    print_json(&json!({
        "order": order,
        "total": order.total(),
        "outcome": describe(&outcome),
    }))
}

fn describe(outcome: &AssignmentOutcome) -> Value {
    match outcome {
        AssignmentOutcome::Assigned {
            assignment,
            method,
            fallback_reason,
        } => json!({
            "method": method,
            "assignment": assignment,
            "fallback_reason": fallback_reason.as_ref().map(ToString::to_string),
        }),
        AssignmentOutcome::Unassigned { reason, zone } => json!({
            "method": outcome.method(),
            "reason": reason.to_string(),
            "zone": zone,
        }),
    }
}
