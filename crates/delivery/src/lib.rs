//! Clean Food delivery engine.
//!
//! Decides which facility fulfils an order, how far the courier travels and
//! what the customer pays for shipping.
//!
//! # Modules
//!
//! - [`geo`] - Haversine distance and polygon containment
//! - [`routing`] - Road routes from an OSRM-compatible provider
//! - [`fee`] - Base + per-km shipping fees
//! - [`locator`] - Nearest facilities by straight line or by road
//! - [`zones`] - Serviceable areas, fees and delivery times
//! - [`optimizer`] - Greedy multi-stop ordering
//! - [`assignment`] - Order-to-facility assignment with straight-line fallback
//! - [`engine`] - [`DeliveryEngine`], everything wired from [`DeliveryConfig`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assignment;
pub mod config;
pub mod engine;
pub mod error;
pub mod fee;
pub mod geo;
pub mod locator;
pub mod optimizer;
pub mod routing;
pub mod zones;

pub use config::{ConfigError, DeliveryConfig, RoutingConfig};
pub use engine::{DeliveryEngine, RouteQuote};
pub use error::DeliveryError;
