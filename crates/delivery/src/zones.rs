//! Delivery zone availability.
//!
//! A point is checked against zone boundaries first (first active zone whose
//! polygon contains it), then against a reference radius around the city
//! center. The radius check is a coarse approximation and results carry
//! [`ZoneMatchBasis`] so callers can tell the two apart.
//!
//! Boundaries are data: a JSON object mapping zone name to a closed ring of
//! `[longitude, latitude]` positions. A table for the southern provinces ships
//! with the crate, see [`BoundaryTable::builtin`].

use std::collections::BTreeMap;

use clean_food_core::{Coordinate, DeliveryZone, Vnd};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::DeliveryError;
use crate::geo;

const BUILTIN_BOUNDARIES: &str = include_str!("../data/southern_vietnam_zones.json");

/// Message shown when a point is outside every serviceable area.
pub const NOT_SERVICEABLE_MESSAGE: &str = "Delivery is not available in this area";

/// A city center with a serviceable radius and flat fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceArea {
    pub name: String,
    pub center: Coordinate,
    /// Points strictly closer than this are serviceable.
    pub radius_km: f64,
    pub fee: Vnd,
    pub eta_description: String,
}

impl Default for ReferenceArea {
    fn default() -> Self {
        Self {
            name: "Ho Chi Minh City".to_string(),
            center: Coordinate::SAIGON_CENTER,
            radius_km: 20.0,
            fee: Vnd::new(30_000),
            eta_description: "1-2 days".to_string(),
        }
    }
}

/// What an availability answer was based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneMatchBasis {
    /// The point is inside a zone polygon.
    Boundary,
    /// The point is within the reference radius.
    ReferenceRadius,
    /// Nothing matched.
    None,
}

/// Result of [`DeliveryZoneChecker::check_availability`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAvailability {
    pub can_deliver: bool,
    pub zone_name: Option<String>,
    pub fee: Vnd,
    pub eta_description: String,
    pub basis: ZoneMatchBasis,
}

impl ZoneAvailability {
    /// The answer for a point outside every serviceable area.
    #[must_use]
    pub fn not_serviceable() -> Self {
        Self {
            can_deliver: false,
            zone_name: None,
            fee: Vnd::ZERO,
            eta_description: NOT_SERVICEABLE_MESSAGE.to_string(),
            basis: ZoneMatchBasis::None,
        }
    }
}

// =============================================================================
// Boundary table
// =============================================================================

/// Zone name to polygon ring.
#[derive(Debug, Clone, Default)]
pub struct BoundaryTable {
    rings: BTreeMap<String, Vec<Coordinate>>,
}

impl BoundaryTable {
    /// Parse a boundary table from JSON.
    ///
    /// The expected shape is `{"Zone name": [[lon, lat], ...], ...}`. Each ring
    /// needs at least three distinct positions; a closing position equal to
    /// the first one is allowed but not required.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::ZoneBoundary` if the JSON is malformed, a
    /// position is out of range, or a ring is too short.
    pub fn from_json(json: &str) -> Result<Self, DeliveryError> {
        let raw: BTreeMap<String, Vec<[f64; 2]>> =
            serde_json::from_str(json).map_err(|e| DeliveryError::ZoneBoundary(e.to_string()))?;

        let mut rings = BTreeMap::new();
        for (name, positions) in raw {
            let ring = positions
                .into_iter()
                .map(Coordinate::from_lon_lat)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| DeliveryError::ZoneBoundary(format!("{name}: {e}")))?;

            let open_len = match (ring.first(), ring.last()) {
                (Some(first), Some(last)) if ring.len() > 1 && first == last => ring.len() - 1,
                _ => ring.len(),
            };
            if open_len < 3 {
                return Err(DeliveryError::ZoneBoundary(format!(
                    "{name}: a ring needs at least 3 positions"
                )));
            }

            rings.insert(name, ring);
        }

        Ok(Self { rings })
    }

    /// The boundary table for the southern Vietnamese provinces.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::ZoneBoundary` if the bundled data is invalid.
    pub fn builtin() -> Result<Self, DeliveryError> {
        Self::from_json(BUILTIN_BOUNDARIES)
    }

    /// Ring for a zone name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Coordinate]> {
        self.rings.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Zone names in the table, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rings.keys().map(String::as_str)
    }
}

// =============================================================================
// Checker
// =============================================================================

#[derive(Debug, Clone)]
struct BoundedZone {
    zone: DeliveryZone,
    ring: Vec<Coordinate>,
}

/// Answers "can we deliver here, for how much, and how fast".
#[derive(Debug, Clone)]
pub struct DeliveryZoneChecker {
    zones: Vec<BoundedZone>,
    reference: ReferenceArea,
}

impl DeliveryZoneChecker {
    /// Join active zones with their boundaries by name.
    ///
    /// Inactive zones and zones with no boundary entry are not used for
    /// containment. Zone order is kept: on overlap the earlier zone wins.
    #[must_use]
    pub fn new(
        zones: impl IntoIterator<Item = DeliveryZone>,
        boundaries: &BoundaryTable,
        reference: ReferenceArea,
    ) -> Self {
        let zones = zones
            .into_iter()
            .filter(|zone| zone.is_active)
            .filter_map(|zone| {
                let ring = boundaries.get(&zone.name)?.to_vec();
                Some(BoundedZone { zone, ring })
            })
            .collect();

        Self { zones, reference }
    }

    /// A checker that only uses the reference radius.
    #[must_use]
    pub const fn reference_only(reference: ReferenceArea) -> Self {
        Self {
            zones: Vec::new(),
            reference,
        }
    }

    #[must_use]
    pub const fn reference(&self) -> &ReferenceArea {
        &self.reference
    }

    /// Names of the zones used for containment, in match order.
    pub fn bounded_zone_names(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(|z| z.zone.name.as_str())
    }

    /// Check whether `point` can be served.
    #[must_use]
    pub fn check_availability(&self, point: Coordinate) -> ZoneAvailability {
        if let Some(bounded) = self
            .zones
            .iter()
            .find(|z| geo::ring_contains(&z.ring, point))
        {
            return ZoneAvailability {
                can_deliver: true,
                zone_name: Some(bounded.zone.name.clone()),
                fee: bounded.zone.fee_default,
                eta_description: bounded.zone.time_description.clone(),
                basis: ZoneMatchBasis::Boundary,
            };
        }

        let distance = geo::distance_km(point, self.reference.center);
        if distance < self.reference.radius_km {
            return ZoneAvailability {
                can_deliver: true,
                zone_name: Some(self.reference.name.clone()),
                fee: self.reference.fee,
                eta_description: self.reference.eta_description.clone(),
                basis: ZoneMatchBasis::ReferenceRadius,
            };
        }

        ZoneAvailability::not_serviceable()
    }

    /// Bounded zones as a GeoJSON `FeatureCollection`.
    #[must_use]
    pub fn zones_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .zones
            .iter()
            .map(|bounded| {
                let ring: Vec<[f64; 2]> = bounded.ring.iter().map(Coordinate::to_lon_lat).collect();
                json!({
                    "type": "Feature",
                    "properties": {
                        "name": bounded.zone.name,
                        "delivery_fee": bounded.zone.fee_default.as_i64(),
                        "delivery_time": bounded.zone.time_description,
                        "area_description": bounded.zone.area_description,
                    },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [ring],
                    },
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}
