//! Delivery engine errors.

use clean_food_core::CoordinateError;
use thiserror::Error;

use crate::routing::RoutingError;

/// Errors produced by the delivery engine.
///
/// Routing failures are normally recovered by falling back to straight-line
/// distance; they surface here only from operations that need a road route,
/// or as the recorded reason for a fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeliveryError {
    /// Road routing failed.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// No facility with a location is within the distance ceiling.
    #[error("no facility is available for this delivery address")]
    NoFacilityAvailable,

    /// The order has no delivery coordinate.
    #[error("order has no delivery coordinate")]
    MissingDeliveryCoordinate,

    /// A coordinate failed validation.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),

    /// Zone boundary data could not be loaded.
    #[error("invalid zone boundary data: {0}")]
    ZoneBoundary(String),
}
