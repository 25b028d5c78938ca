//! Integration tests for the Clean Food delivery engine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p clean-food-integration-tests
//! ```
//!
//! No external services are needed: the routing provider is either a
//! `wiremock` server speaking the OSRM wire format or one of the in-process
//! routers below.
//!
//! # Test Categories
//!
//! - `routing_client` - OSRM HTTP client against a mock server
//! - `order_assignment` - Locator and assignment workflow with fake routers

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use clean_food_core::{Coordinate, Facility, FacilityId, VehicleProfile};
use clean_food_delivery::RoutingConfig;
use clean_food_delivery::routing::{RoadRouter, RouteGeometry, RouteResult, RoutingError};
use serde_json::{Value, json};

/// Build a coordinate from literals.
///
/// # Panics
///
/// Panics if the literals are out of range.
#[must_use]
pub fn coordinate(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).expect("valid test coordinate")
}

/// A located facility named after its id.
///
/// # Panics
///
/// Panics if the literals are out of range.
#[must_use]
pub fn facility(id: i32, lat: f64, lng: f64) -> Facility {
    Facility::new(FacilityId::new(id), format!("Farm {id}"), coordinate(lat, lng))
}

/// Routing configuration pointing at a mock server.
#[must_use]
pub fn routing_config(base_url: &str) -> RoutingConfig {
    RoutingConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(2),
        ..RoutingConfig::default()
    }
}

/// A successful OSRM response body.
#[must_use]
pub fn osrm_ok_body(distance_m: f64, duration_s: f64) -> Value {
    json!({
        "code": "Ok",
        "routes": [{
            "distance": distance_m,
            "duration": duration_s,
            "weight": duration_s,
            "geometry": {
                "type": "LineString",
                "coordinates": [[106.7, 10.9], [106.68, 10.82], [106.66, 10.76]]
            },
            "legs": []
        }],
        "waypoints": []
    })
}

/// Router that fails every request and counts them.
#[derive(Debug, Default)]
pub struct FailingRouter {
    calls: AtomicUsize,
}

impl FailingRouter {
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoadRouter for FailingRouter {
    async fn route(
        &self,
        _origin: Coordinate,
        _destination: Coordinate,
        _vehicle: VehicleProfile,
    ) -> Result<RouteResult, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RoutingError::Timeout(5000))
    }
}

/// Router answering with a fixed road distance per origin.
///
/// Duration is 3 minutes per km. Origins not in the table fail with
/// `NoRoute`. Origins given a delay answer only after sleeping for it.
#[derive(Debug, Default)]
pub struct FixedDistanceRouter {
    distances: Vec<(Coordinate, f64)>,
    delays: Vec<(Coordinate, Duration)>,
}

impl FixedDistanceRouter {
    #[must_use]
    pub fn new(distances: Vec<(Coordinate, f64)>) -> Self {
        Self {
            distances,
            delays: Vec::new(),
        }
    }

    /// Delay answers for routes starting at `facility`.
    ///
    /// # Panics
    ///
    /// Panics if the facility has no coordinate.
    #[must_use]
    pub fn with_delay(mut self, facility: &Facility, delay: Duration) -> Self {
        self.delays
            .push((facility.coordinate.expect("located facility"), delay));
        self
    }

    /// Table keyed by each facility's coordinate.
    ///
    /// # Panics
    ///
    /// Panics if a facility has no coordinate.
    #[must_use]
    pub fn for_facilities(pairs: &[(&Facility, f64)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(facility, km)| (facility.coordinate.expect("located facility"), *km))
                .collect(),
        )
    }
}

#[async_trait]
impl RoadRouter for FixedDistanceRouter {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        vehicle: VehicleProfile,
    ) -> Result<RouteResult, RoutingError> {
        if let Some((_, delay)) = self.delays.iter().find(|(c, _)| *c == origin) {
            tokio::time::sleep(*delay).await;
        }

        let (_, distance_km) = self
            .distances
            .iter()
            .find(|(c, _)| *c == origin)
            .ok_or(RoutingError::NoRoute)?;

        Ok(RouteResult {
            distance_km: *distance_km,
            duration_min: distance_km * 3.0,
            geometry: RouteGeometry::LineString {
                coordinates: vec![origin.to_lon_lat(), destination.to_lon_lat()],
            },
            profile: vehicle.routing_profile(),
            vehicle,
        })
    }
}
