//! Delivery zone commands.
//!
//! Zone files are JSON lists of zones:
//!
//! ```json
//! [{"name": "Bình Dương", "fee_default": 35000, "time_description": "1-2 days"}]
//! ```
//!
//! Boundaries come from the built-in southern provinces table unless
//! `--boundaries` points to a JSON object of `name -> [[lon, lat], ...]`.

use std::path::Path;

use clean_food_core::{Coordinate, DeliveryZone};
use clean_food_delivery::DeliveryConfig;
use clean_food_delivery::zones::{BoundaryTable, DeliveryZoneChecker};
use tracing::info;

use super::{CommandError, print_json, read_json};

/// Build a checker from optional zone and boundary files.
///
/// # Errors
///
/// Returns an error if a file cannot be read or holds invalid data.
pub fn load_checker(
    config: &DeliveryConfig,
    zones_path: Option<&Path>,
    boundaries_path: Option<&Path>,
) -> Result<DeliveryZoneChecker, CommandError> {
    let zones: Vec<DeliveryZone> = match zones_path {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    let boundaries = match boundaries_path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| CommandError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            BoundaryTable::from_json(&content)?
        }
        None => BoundaryTable::builtin()?,
    };

    let checker = DeliveryZoneChecker::new(zones, &boundaries, config.service_area.clone());
    info!(
        bounded_zones = checker.bounded_zone_names().count(),
        boundaries = boundaries.len(),
        "Loaded delivery zones"
    );
    Ok(checker)
}

/// Print zone availability for a point.
///
/// # Errors
///
/// Returns an error if an input file or the configuration is invalid.
pub fn check(
    point: Coordinate,
    zones_path: Option<&Path>,
    boundaries_path: Option<&Path>,
) -> Result<(), CommandError> {
    let config = DeliveryConfig::from_env()?;
    let checker = load_checker(&config, zones_path, boundaries_path)?;
    print_json(&checker.check_availability(point))
}

/// Print the bounded zones as a GeoJSON `FeatureCollection`.
///
/// # Errors
///
/// Returns an error if an input file or the configuration is invalid.
pub fn geojson(zones_path: &Path, boundaries_path: Option<&Path>) -> Result<(), CommandError> {
    let config = DeliveryConfig::from_env()?;
    let checker = load_checker(&config, Some(zones_path), boundaries_path)?;
    print_json(&checker.zones_geojson())
}
