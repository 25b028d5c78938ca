//! Route results and the provider's wire format.

use clean_food_core::{RoutingProfile, VehicleProfile};
use serde::{Deserialize, Serialize};

/// A routed path between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub distance_km: f64,
    pub duration_min: f64,
    pub geometry: RouteGeometry,
    /// Network the provider routed on.
    pub profile: RoutingProfile,
    /// Vehicle the caller asked for; `duration_min` is adjusted for it.
    pub vehicle: VehicleProfile,
}

/// GeoJSON geometry of a route, positions in `[longitude, latitude]` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RouteGeometry {
    LineString { coordinates: Vec<[f64; 2]> },
}

impl RouteGeometry {
    /// Positions along the path.
    #[must_use]
    pub fn positions(&self) -> &[[f64; 2]] {
        match self {
            Self::LineString { coordinates } => coordinates,
        }
    }
}

// =============================================================================
// Wire types
// =============================================================================

/// `GET /route/v1/...` response body.
#[derive(Debug, Deserialize)]
pub(super) struct OsrmResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OsrmRoute {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    pub geometry: RouteGeometry,
}

/// Minimal body shape for provider errors returned with a non-2xx status.
#[derive(Debug, Deserialize)]
pub(super) struct OsrmErrorBody {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
}
