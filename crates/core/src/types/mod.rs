//! Core types for the clean food delivery engine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod coordinate;
pub mod facility;
pub mod id;
pub mod order;
pub mod price;
pub mod status;

pub use coordinate::{Coordinate, CoordinateError, CoordinateParseError};
pub use facility::{DeliveryZone, Facility};
pub use id::*;
pub use order::{DeliveryLeg, Order, OrderError};
pub use price::Vnd;
pub use status::*;
