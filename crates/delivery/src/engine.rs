//! Shared entry point wiring the delivery components together.

use std::sync::Arc;

use clean_food_core::{Coordinate, DeliveryZone, Facility, Order, VehicleProfile};
use serde::Serialize;
use tracing::instrument;

use crate::assignment::{AssignmentOutcome, OrderAssigner};
use crate::config::DeliveryConfig;
use crate::error::DeliveryError;
use crate::fee::{FeeSchedule, ShippingFee};
use crate::locator::{FacilityLocator, RankedFacility, SearchMode};
use crate::routing::{OsrmClient, RoadRouter, RouteResult};
use crate::zones::{BoundaryTable, DeliveryZoneChecker, ZoneAvailability};

/// A road route together with its uncapped shipping fee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteQuote {
    pub route: RouteResult,
    pub fee: ShippingFee,
}

/// Delivery engine handle.
///
/// Cheap to clone; clones share the router, its cache and the zone data.
#[derive(Clone)]
pub struct DeliveryEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: DeliveryConfig,
    locator: FacilityLocator,
    zones: DeliveryZoneChecker,
}

impl DeliveryEngine {
    /// Build an engine backed by the OSRM provider from `config`, with zone
    /// boundaries from the built-in table.
    ///
    /// # Errors
    ///
    /// Returns an error if the routing client cannot be built or the bundled
    /// boundary data is invalid.
    pub fn new(
        config: DeliveryConfig,
        zones: impl IntoIterator<Item = DeliveryZone>,
    ) -> Result<Self, DeliveryError> {
        let boundaries = BoundaryTable::builtin()?;
        let checker = DeliveryZoneChecker::new(zones, &boundaries, config.service_area.clone());
        Self::with_zone_checker(config, checker)
    }

    /// Build an engine backed by the OSRM provider with a prepared zone
    /// checker.
    ///
    /// # Errors
    ///
    /// Returns an error if the routing client cannot be built.
    pub fn with_zone_checker(
        config: DeliveryConfig,
        zones: DeliveryZoneChecker,
    ) -> Result<Self, DeliveryError> {
        let router = Arc::new(OsrmClient::new(&config.routing)?);
        Ok(Self::with_router(config, router, zones))
    }

    /// Build an engine with a custom router and zone checker.
    #[must_use]
    pub fn with_router(
        config: DeliveryConfig,
        router: Arc<dyn RoadRouter>,
        zones: DeliveryZoneChecker,
    ) -> Self {
        let locator = FacilityLocator::new(router, config.routing.concurrency);
        Self {
            inner: Arc::new(EngineInner {
                config,
                locator,
                zones,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &DeliveryConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn locator(&self) -> &FacilityLocator {
        &self.inner.locator
    }

    #[must_use]
    pub fn zones(&self) -> &DeliveryZoneChecker {
        &self.inner.zones
    }

    /// Assigner using the configured fee schedule and distance ceiling.
    #[must_use]
    pub fn assigner(&self, vehicle: VehicleProfile) -> OrderAssigner {
        OrderAssigner::new(
            self.inner.locator.clone(),
            self.inner.zones.clone(),
            self.inner.config.fees,
            self.inner.config.max_distance_km,
        )
        .with_vehicle(vehicle)
    }

    /// Route from a facility to a customer and price it.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::NoFacilityAvailable` if the facility has no
    /// location, or `DeliveryError::Routing` if the provider fails.
    #[instrument(skip(self, facility), fields(facility_id = %facility.id))]
    pub async fn quote_route(
        &self,
        facility: &Facility,
        customer: Coordinate,
        vehicle: VehicleProfile,
    ) -> Result<RouteQuote, DeliveryError> {
        let origin = facility
            .coordinate
            .ok_or(DeliveryError::NoFacilityAvailable)?;
        self.quote_between(origin, customer, vehicle).await
    }

    /// Route between two arbitrary points and price it.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Routing` if the provider fails.
    pub async fn quote_between(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        vehicle: VehicleProfile,
    ) -> Result<RouteQuote, DeliveryError> {
        let route = self
            .inner
            .locator
            .router()
            .route(origin, destination, vehicle)
            .await?;

        let schedule = FeeSchedule {
            cap: None,
            ..self.inner.config.fees
        };
        let fee = schedule.compute(route.distance_km);

        Ok(RouteQuote { route, fee })
    }

    /// See [`FacilityLocator::find_nearest`].
    pub async fn find_nearest(
        &self,
        facilities: &[Facility],
        customer: Coordinate,
        max_distance_km: f64,
        limit: usize,
        mode: SearchMode,
    ) -> Vec<RankedFacility> {
        self.inner
            .locator
            .find_nearest(facilities, customer, max_distance_km, limit, mode)
            .await
    }

    #[must_use]
    pub fn check_availability(&self, point: Coordinate) -> ZoneAvailability {
        self.inner.zones.check_availability(point)
    }

    /// Assign an order by car unless it is already assigned.
    pub async fn assign_order(
        &self,
        order: &mut Order,
        facilities: &[Facility],
    ) -> Option<AssignmentOutcome> {
        self.assigner(VehicleProfile::Car)
            .assign_order(order, facilities)
            .await
    }
}
