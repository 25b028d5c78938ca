//! Clean Food Core - Shared types library.
//!
//! This crate provides common types used across all clean food delivery components:
//! - `delivery` - Facility assignment, routing and shipping fee engine
//! - `cli` - Operator diagnostics for the engine
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Coordinates, typed IDs, money, facilities, zones, orders and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
