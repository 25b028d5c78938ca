//! The delivery-related slice of a customer order.
//!
//! Orders travel as flat records with the columns the order store keeps:
//!
//! ```json
//! {
//!   "id": 7,
//!   "delivery_coordinate": {"latitude": 10.8, "longitude": 106.7},
//!   "subtotal": 240000,
//!   "assigned_facility_id": 3,
//!   "delivery_distance_km": 4.2,
//!   "delivery_duration_min": 11.0,
//!   "delivery_fee": 36000,
//!   "assignment_method": "road"
//! }
//! ```
//!
//! Deserialization rejects records whose assignment columns disagree.

use serde::{Deserialize, Serialize};

use super::{AssignmentMethod, Coordinate, FacilityId, OrderId, Vnd};

/// Errors for order records with an inconsistent assignment.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderError {
    /// Only some of facility, distance and duration are set.
    #[error(
        "assigned_facility_id, delivery_distance_km and delivery_duration_min must be set together"
    )]
    PartialAssignment,
    /// A facility is recorded but the method says the order is unassigned.
    #[error("order has a facility but assignment_method is unassigned")]
    MissingMethod,
    /// The method names a facility choice but no facility is recorded.
    #[error("assignment_method is {0} but no facility is assigned")]
    MethodWithoutFacility(AssignmentMethod),
}

/// Facility, distance, duration and method recorded for an assigned order.
///
/// Kept as one value so an order can never hold a facility without the
/// matching distance, duration and method (or the reverse).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryLeg {
    pub facility_id: FacilityId,
    pub distance_km: f64,
    pub duration_min: f64,
    pub method: AssignmentMethod,
}

/// Order fields read and written by the delivery engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OrderRecord", into = "OrderRecord")]
pub struct Order {
    pub id: OrderId,
    pub delivery_coordinate: Option<Coordinate>,
    pub subtotal: Vnd,
    leg: Option<DeliveryLeg>,
    delivery_fee: Vnd,
}

#[derive(Serialize, Deserialize)]
struct OrderRecord {
    id: OrderId,
    delivery_coordinate: Option<Coordinate>,
    subtotal: Vnd,
    #[serde(default)]
    assigned_facility_id: Option<FacilityId>,
    #[serde(default)]
    delivery_distance_km: Option<f64>,
    #[serde(default)]
    delivery_duration_min: Option<f64>,
    #[serde(default)]
    delivery_fee: Vnd,
    #[serde(default)]
    assignment_method: AssignmentMethod,
}

impl TryFrom<OrderRecord> for Order {
    type Error = OrderError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let leg = match (
            record.assigned_facility_id,
            record.delivery_distance_km,
            record.delivery_duration_min,
            record.assignment_method,
        ) {
            (None, None, None, AssignmentMethod::Unassigned) => None,
            (None, None, None, method) => return Err(OrderError::MethodWithoutFacility(method)),
            (Some(_), Some(_), Some(_), AssignmentMethod::Unassigned) => {
                return Err(OrderError::MissingMethod);
            }
            (Some(facility_id), Some(distance_km), Some(duration_min), method) => {
                Some(DeliveryLeg {
                    facility_id,
                    distance_km,
                    duration_min,
                    method,
                })
            }
            _ => return Err(OrderError::PartialAssignment),
        };

        Ok(Self {
            id: record.id,
            delivery_coordinate: record.delivery_coordinate,
            subtotal: record.subtotal,
            leg,
            delivery_fee: record.delivery_fee,
        })
    }
}

impl From<Order> for OrderRecord {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            delivery_coordinate: order.delivery_coordinate,
            subtotal: order.subtotal,
            assigned_facility_id: order.assigned_facility_id(),
            delivery_distance_km: order.delivery_distance_km(),
            delivery_duration_min: order.delivery_duration_min(),
            delivery_fee: order.delivery_fee,
            assignment_method: order.assignment_method(),
        }
    }
}

impl Order {
    /// Create an unassigned order.
    #[must_use]
    pub const fn new(id: OrderId, delivery_coordinate: Option<Coordinate>, subtotal: Vnd) -> Self {
        Self {
            id,
            delivery_coordinate,
            subtotal,
            leg: None,
            delivery_fee: Vnd::ZERO,
        }
    }

    /// Record a facility assignment together with its fee.
    pub const fn assign(&mut self, leg: DeliveryLeg, fee: Vnd) {
        self.leg = Some(leg);
        self.delivery_fee = fee;
    }

    /// Drop any assignment and charge the given default fee instead.
    pub const fn leave_unassigned(&mut self, default_fee: Vnd) {
        self.leg = None;
        self.delivery_fee = default_fee;
    }

    /// The recorded delivery leg, if a facility is assigned.
    #[must_use]
    pub const fn leg(&self) -> Option<&DeliveryLeg> {
        self.leg.as_ref()
    }

    #[must_use]
    pub fn assigned_facility_id(&self) -> Option<FacilityId> {
        self.leg.map(|leg| leg.facility_id)
    }

    #[must_use]
    pub fn delivery_distance_km(&self) -> Option<f64> {
        self.leg.map(|leg| leg.distance_km)
    }

    #[must_use]
    pub fn delivery_duration_min(&self) -> Option<f64> {
        self.leg.map(|leg| leg.duration_min)
    }

    #[must_use]
    pub const fn delivery_fee(&self) -> Vnd {
        self.delivery_fee
    }

    #[must_use]
    pub fn assignment_method(&self) -> AssignmentMethod {
        self.leg.map_or(AssignmentMethod::Unassigned, |leg| leg.method)
    }

    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.leg.is_some()
    }

    /// Order total including delivery.
    #[must_use]
    pub fn total(&self) -> Vnd {
        self.subtotal + self.delivery_fee
    }
}
