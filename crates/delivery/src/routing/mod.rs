//! Road routing through an OSRM-compatible provider.
//!
//! # Architecture
//!
//! - [`RoadRouter`] is the seam the locator and assignment workflow depend on
//! - [`OsrmClient`] implements it over HTTP with `reqwest`
//! - Successful provider responses are cached in memory via `moka`
//!   (5 minute TTL by default)
//!
//! Every failure mode (timeout, transport error, non-2xx status, non-`Ok`
//! provider code, empty or malformed payload) surfaces as a [`RoutingError`].
//! Callers are expected to fall back to straight-line distance.
//!
//! # Example
//!
//! ```rust,ignore
//! use clean_food_delivery::routing::{OsrmClient, RoadRouter};
//!
//! let client = OsrmClient::new(&config.routing)?;
//! let route = client.route(farm, customer, VehicleProfile::Motorbike).await?;
//! println!("{:.1} km, {:.0} min", route.distance_km, route.duration_min);
//! ```

mod client;
mod types;

pub use client::OsrmClient;
pub use types::{RouteGeometry, RouteResult};

use async_trait::async_trait;
use clean_food_core::{Coordinate, VehicleProfile};
use thiserror::Error;

/// Legs up to this length get the full two-wheeler discount.
const URBAN_LEG_KM: f64 = 20.0;

/// Legs up to this length get the reduced two-wheeler discount.
const SUBURBAN_LEG_KM: f64 = 50.0;

/// Errors that can occur when requesting a route.
///
/// None of these carry partial route data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The provider did not answer within the configured timeout.
    #[error("routing provider timed out after {0} ms")]
    Timeout(u64),

    /// Connection or protocol failure.
    #[error("routing transport error: {0}")]
    Transport(String),

    /// Non-2xx response without a recognisable provider error body.
    #[error("routing provider returned HTTP {0}")]
    HttpStatus(u16),

    /// Provider answered with a code other than `Ok`.
    #[error("routing provider returned {code}: {message}")]
    Provider { code: String, message: String },

    /// Provider answered `Ok` but with no routes.
    #[error("no route found between the given points")]
    NoRoute,

    /// Response body could not be understood.
    #[error("malformed routing response: {0}")]
    MalformedPayload(String),

    /// The HTTP client or request URL could not be built.
    #[error("routing client error: {0}")]
    Client(String),
}

/// Something that can compute a road route between two coordinates.
#[async_trait]
pub trait RoadRouter: Send + Sync {
    /// Route from `origin` to `destination` for the given vehicle.
    ///
    /// # Errors
    ///
    /// Returns a [`RoutingError`] for any provider failure.
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        vehicle: VehicleProfile,
    ) -> Result<RouteResult, RoutingError>;
}

/// Adjust a driving-network duration for the requested vehicle.
///
/// Motorbikes move faster than cars through city traffic: 25% off legs up to
/// 20 km, 15% off legs up to 50 km, unchanged beyond that. Every other
/// vehicle is returned as-is.
#[must_use]
pub fn adjust_duration(vehicle: VehicleProfile, distance_km: f64, duration_min: f64) -> f64 {
    if vehicle != VehicleProfile::Motorbike {
        return duration_min;
    }

    if distance_km <= URBAN_LEG_KM {
        duration_min * 0.75
    } else if distance_km <= SUBURBAN_LEG_KM {
        duration_min * 0.85
    } else {
        duration_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motorbike_urban_discount() {
        let d = adjust_duration(VehicleProfile::Motorbike, 12.0, 40.0);
        assert!((d - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_motorbike_boundary_is_urban() {
        let d = adjust_duration(VehicleProfile::Motorbike, 20.0, 40.0);
        assert!((d - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_motorbike_suburban_discount() {
        let d = adjust_duration(VehicleProfile::Motorbike, 35.0, 60.0);
        assert!((d - 51.0).abs() < 1e-9);
    }

    #[test]
    fn test_motorbike_long_haul_unchanged() {
        let d = adjust_duration(VehicleProfile::Motorbike, 80.0, 90.0);
        assert!((d - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_other_vehicles_unchanged() {
        for vehicle in [
            VehicleProfile::Car,
            VehicleProfile::Bicycle,
            VehicleProfile::Foot,
        ] {
            assert!((adjust_duration(vehicle, 5.0, 20.0) - 20.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            RoutingError::Timeout(5000).to_string(),
            "routing provider timed out after 5000 ms"
        );
        assert_eq!(
            RoutingError::Provider {
                code: "NoRoute".to_string(),
                message: "Impossible route".to_string(),
            }
            .to_string(),
            "routing provider returned NoRoute: Impossible route"
        );
    }
}
