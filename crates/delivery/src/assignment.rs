//! Order-to-facility assignment.
//!
//! # Workflow
//!
//! 1. Rank facilities by road distance (nearest within the ceiling wins)
//! 2. If no facility could be routed at all, fall back to the nearest by
//!    straight line, with no ceiling, estimating 2 minutes per km
//! 3. If routing worked but everything is beyond the ceiling, or no facility
//!    has a location, leave the order unassigned with the zone default fee
//!
//! Routing failures never fail the order; they are recorded as the fallback
//! reason and logged.

use chrono::{DateTime, Utc};
use clean_food_core::{
    AssignmentMethod, Coordinate, DeliveryLeg, Facility, FacilityId, Order, VehicleProfile, Vnd,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::DeliveryError;
use crate::fee::{FeeSchedule, ShippingFee};
use crate::locator::{FacilityLocator, RankedFacility, UNLIMITED_DISTANCE_KM, rank_straight_line};
use crate::routing::RouteGeometry;
use crate::zones::{DeliveryZoneChecker, ZoneAvailability};

/// Minutes per kilometer assumed when no road duration is known.
pub const FALLBACK_MINUTES_PER_KM: f64 = 2.0;

/// The facility chosen for an order and what it costs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryAssignment {
    pub facility_id: FacilityId,
    pub facility_name: String,
    pub distance_km: f64,
    pub duration_min: f64,
    pub fee: ShippingFee,
    /// Road path, absent for straight-line fallbacks.
    pub geometry: Option<RouteGeometry>,
    pub assigned_at: DateTime<Utc>,
}

impl DeliveryAssignment {
    /// The leg recorded on the order when this assignment is applied.
    #[must_use]
    pub const fn leg(&self, method: AssignmentMethod) -> DeliveryLeg {
        DeliveryLeg {
            facility_id: self.facility_id,
            distance_km: self.distance_km,
            duration_min: self.duration_min,
            method,
        }
    }
}

/// Result of running the assignment workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentOutcome {
    Assigned {
        assignment: DeliveryAssignment,
        method: AssignmentMethod,
        /// Why the road ranking was not used, for fallbacks.
        fallback_reason: Option<DeliveryError>,
    },
    Unassigned {
        reason: DeliveryError,
        /// Zone answer that supplies the default fee.
        zone: ZoneAvailability,
    },
}

impl AssignmentOutcome {
    #[must_use]
    pub const fn method(&self) -> AssignmentMethod {
        match self {
            Self::Assigned { method, .. } => *method,
            Self::Unassigned { .. } => AssignmentMethod::Unassigned,
        }
    }

    #[must_use]
    pub const fn assignment(&self) -> Option<&DeliveryAssignment> {
        match self {
            Self::Assigned { assignment, .. } => Some(assignment),
            Self::Unassigned { .. } => None,
        }
    }

    /// Fee the customer is charged.
    #[must_use]
    pub const fn fee(&self) -> Vnd {
        match self {
            Self::Assigned { assignment, .. } => assignment.fee.total,
            Self::Unassigned { zone, .. } => zone.fee,
        }
    }

    /// Write the outcome onto an order.
    pub fn apply_to(&self, order: &mut Order) {
        match self {
            Self::Assigned {
                assignment, method, ..
            } => order.assign(assignment.leg(*method), assignment.fee.total),
            Self::Unassigned { zone, .. } => order.leave_unassigned(zone.fee),
        }
    }
}

/// Runs the assignment workflow.
#[derive(Clone)]
pub struct OrderAssigner {
    locator: FacilityLocator,
    zones: DeliveryZoneChecker,
    fees: FeeSchedule,
    max_distance_km: f64,
    vehicle: VehicleProfile,
}

impl OrderAssigner {
    /// Create an assigner routing by car.
    #[must_use]
    pub const fn new(
        locator: FacilityLocator,
        zones: DeliveryZoneChecker,
        fees: FeeSchedule,
        max_distance_km: f64,
    ) -> Self {
        Self {
            locator,
            zones,
            fees,
            max_distance_km,
            vehicle: VehicleProfile::Car,
        }
    }

    /// Route with a different vehicle.
    #[must_use]
    pub const fn with_vehicle(mut self, vehicle: VehicleProfile) -> Self {
        self.vehicle = vehicle;
        self
    }

    /// Pick a facility for a delivery to `destination`.
    #[instrument(skip(self, facilities), fields(candidates = facilities.len()))]
    pub async fn assign(
        &self,
        facilities: &[Facility],
        destination: Option<Coordinate>,
    ) -> AssignmentOutcome {
        let Some(destination) = destination else {
            warn!("Order has no delivery coordinate, leaving unassigned");
            return AssignmentOutcome::Unassigned {
                reason: DeliveryError::MissingDeliveryCoordinate,
                zone: ZoneAvailability::not_serviceable(),
            };
        };

        if !facilities.iter().any(|f| f.coordinate.is_some()) {
            warn!("No facility has a location, leaving unassigned");
            return self.unassigned(destination);
        }

        let mut ranking = self
            .locator
            .rank_by_road_detailed(facilities, destination, self.max_distance_km, 1, self.vehicle)
            .await;

        if let Some(nearest) = ranking.ranked.drain(..).next() {
            return self.assigned_by_road(nearest);
        }

        if !ranking.routing_unavailable() {
            warn!(
                routed = ranking.routed,
                max_distance_km = self.max_distance_km,
                "Every routed facility is beyond the distance ceiling"
            );
            return self.unassigned(destination);
        }

        let fallback_reason = ranking
            .failures
            .into_iter()
            .next()
            .map(|(_, e)| DeliveryError::from(e));

        let Some(nearest) =
            rank_straight_line(facilities, destination, UNLIMITED_DISTANCE_KM, 1)
                .into_iter()
                .next()
        else {
            return self.unassigned(destination);
        };

        let assignment = DeliveryAssignment {
            facility_id: nearest.facility.id,
            facility_name: nearest.facility.name,
            distance_km: nearest.distance_km,
            duration_min: nearest.distance_km * FALLBACK_MINUTES_PER_KM,
            fee: self.fees.compute(nearest.distance_km),
            geometry: None,
            assigned_at: Utc::now(),
        };

        warn!(
            facility_id = %assignment.facility_id,
            distance_km = assignment.distance_km,
            reason = ?fallback_reason,
            "Routing unavailable, assigned by straight-line distance"
        );

        AssignmentOutcome::Assigned {
            assignment,
            method: AssignmentMethod::StraightLineFallback,
            fallback_reason,
        }
    }

    /// Run the workflow for an order and record the result on it.
    ///
    /// Orders that already have a facility are left untouched and `None` is
    /// returned; use [`reassign_order`](Self::reassign_order) to force it.
    pub async fn assign_order(
        &self,
        order: &mut Order,
        facilities: &[Facility],
    ) -> Option<AssignmentOutcome> {
        if order.is_assigned() {
            info!(order_id = %order.id, "Order already assigned, skipping");
            return None;
        }

        Some(self.reassign_order(order, facilities).await)
    }

    /// Run the workflow for an order regardless of its current assignment.
    pub async fn reassign_order(&self, order: &mut Order, facilities: &[Facility]) -> AssignmentOutcome {
        let outcome = self.assign(facilities, order.delivery_coordinate).await;
        outcome.apply_to(order);

        match &outcome {
            AssignmentOutcome::Assigned {
                assignment, method, ..
            } => info!(
                order_id = %order.id,
                facility_id = %assignment.facility_id,
                method = ?method,
                distance_km = assignment.distance_km,
                fee = %assignment.fee.total,
                "Order assigned"
            ),
            AssignmentOutcome::Unassigned { reason, zone } => info!(
                order_id = %order.id,
                reason = %reason,
                fee = %zone.fee,
                "Order left unassigned"
            ),
        }

        outcome
    }

    fn assigned_by_road(&self, nearest: RankedFacility) -> AssignmentOutcome {
        let (duration_min, geometry) = nearest.route.map_or(
            (nearest.distance_km * FALLBACK_MINUTES_PER_KM, None),
            |route| (route.duration_min, Some(route.geometry)),
        );

        AssignmentOutcome::Assigned {
            assignment: DeliveryAssignment {
                facility_id: nearest.facility.id,
                facility_name: nearest.facility.name,
                distance_km: nearest.distance_km,
                duration_min,
                fee: self.fees.compute(nearest.distance_km),
                geometry,
                assigned_at: Utc::now(),
            },
            method: AssignmentMethod::Road,
            fallback_reason: None,
        }
    }

    fn unassigned(&self, destination: Coordinate) -> AssignmentOutcome {
        AssignmentOutcome::Unassigned {
            reason: DeliveryError::NoFacilityAvailable,
            zone: self.zones.check_availability(destination),
        }
    }
}
