//! Delivery engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! ## Routing
//! - `ROUTING_BASE_URL` - OSRM-compatible provider (default: <http://router.project-osrm.org>)
//! - `ROUTING_TIMEOUT_MS` - Per-request timeout, non-zero (default: 5000)
//! - `ROUTING_CACHE_TTL_SECS` - Route cache TTL (default: 300)
//! - `ROUTING_CACHE_CAPACITY` - Route cache entries (default: 1000)
//! - `ROUTING_CONCURRENCY` - Parallel provider calls while ranking, non-zero (default: 8)
//!
//! ## Fees
//! - `DELIVERY_BASE_FEE` - Flat fee in đồng (default: 15000)
//! - `DELIVERY_PER_KM_FEE` - Fee per kilometer in đồng (default: 5000)
//! - `DELIVERY_FEE_CAP` - Cap for assigned orders in đồng, empty to disable (default: 50000)
//! - `DELIVERY_MAX_DISTANCE_KM` - Road distance ceiling for assignment (default: 50)
//!
//! ## Service area
//! - `DELIVERY_CENTER_LAT` / `DELIVERY_CENTER_LNG` - Reference city center
//!   (default: 10.762622 / 106.660172)
//! - `DELIVERY_SERVICE_RADIUS_KM` - Serviceable radius around the center (default: 20)
//! - `DELIVERY_DEFAULT_ZONE_FEE` - Fee inside the radius in đồng (default: 30000)

use std::str::FromStr;
use std::time::Duration;

use clean_food_core::{Coordinate, Vnd};
use thiserror::Error;
use url::Url;

use crate::fee::{ASSIGNMENT_FEE_CAP, DEFAULT_BASE_FEE, DEFAULT_PER_KM_FEE, FeeSchedule};
use crate::zones::ReferenceArea;

const DEFAULT_ROUTING_BASE_URL: &str = "http://router.project-osrm.org";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Delivery engine configuration.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Routing provider configuration
    pub routing: RoutingConfig,
    /// Fee schedule used for order assignment
    pub fees: FeeSchedule,
    /// Road distance ceiling for assignment, in km
    pub max_distance_km: f64,
    /// Reference-radius service area
    pub service_area: ReferenceArea,
}

/// Routing provider configuration.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Provider base URL (no trailing `/route/v1`)
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Route cache time-to-live
    pub cache_ttl: Duration,
    /// Maximum cached routes
    pub cache_capacity: u64,
    /// Maximum concurrent provider calls while ranking facilities
    pub concurrency: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ROUTING_BASE_URL.to_string(),
            timeout: Duration::from_millis(5000),
            cache_ttl: Duration::from_secs(300),
            cache_capacity: 1000,
            concurrency: 8,
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            routing: RoutingConfig::default(),
            fees: FeeSchedule::default().with_cap(Some(ASSIGNMENT_FEE_CAP)),
            max_distance_km: 50.0,
            service_area: ReferenceArea::default(),
        }
    }
}

impl DeliveryConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let routing = RoutingConfig::from_env()?;
        let fees = FeeSchedule {
            base_fee: Vnd::new(parse_env_or("DELIVERY_BASE_FEE", DEFAULT_BASE_FEE.as_i64())?),
            per_km_fee: Vnd::new(parse_env_or(
                "DELIVERY_PER_KM_FEE",
                DEFAULT_PER_KM_FEE.as_i64(),
            )?),
            cap: parse_fee_cap(
                "DELIVERY_FEE_CAP",
                get_optional_env("DELIVERY_FEE_CAP").as_deref(),
            )?,
        };
        let max_distance_km =
            parse_env_or("DELIVERY_MAX_DISTANCE_KM", defaults.max_distance_km)?;

        let default_area = defaults.service_area;
        let center_lat = parse_env_or("DELIVERY_CENTER_LAT", default_area.center.latitude())?;
        let center_lng = parse_env_or("DELIVERY_CENTER_LNG", default_area.center.longitude())?;
        let center = Coordinate::new(center_lat, center_lng).map_err(|e| {
            ConfigError::InvalidEnvVar("DELIVERY_CENTER_LAT/LNG".to_string(), e.to_string())
        })?;
        let service_area = ReferenceArea {
            center,
            radius_km: parse_env_or("DELIVERY_SERVICE_RADIUS_KM", default_area.radius_km)?,
            fee: Vnd::new(parse_env_or(
                "DELIVERY_DEFAULT_ZONE_FEE",
                default_area.fee.as_i64(),
            )?),
            ..default_area
        };

        Ok(Self {
            routing,
            fees,
            max_distance_km,
            service_area,
        })
    }
}

impl RoutingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_env_or_default("ROUTING_BASE_URL", DEFAULT_ROUTING_BASE_URL);
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("ROUTING_BASE_URL".to_string(), e.to_string())
        })?;

        let concurrency = require_nonzero(
            "ROUTING_CONCURRENCY",
            parse_env_or("ROUTING_CONCURRENCY", 8_usize)?,
        )?;
        let timeout_ms = require_nonzero(
            "ROUTING_TIMEOUT_MS",
            parse_env_or("ROUTING_TIMEOUT_MS", 5000_u64)?,
        )?;

        Ok(Self {
            base_url,
            timeout: Duration::from_millis(timeout_ms),
            cache_ttl: Duration::from_secs(parse_env_or("ROUTING_CACHE_TTL_SECS", 300)?),
            cache_capacity: parse_env_or("ROUTING_CACHE_CAPACITY", 1000)?,
            concurrency,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// The fee cap: unset means the default cap, empty means no cap.
fn parse_fee_cap(key: &str, raw: Option<&str>) -> Result<Option<Vnd>, ConfigError> {
    match raw {
        None => Ok(Some(ASSIGNMENT_FEE_CAP)),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_value::<i64>(key, raw).map(|cap| Some(Vnd::new(cap))),
    }
}

fn require_nonzero<T>(key: &str, value: T) -> Result<T, ConfigError>
where
    T: PartialEq + Default,
{
    if value == T::default() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(value)
}
