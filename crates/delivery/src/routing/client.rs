//! OSRM HTTP client.
//!
//! Uses `reqwest` for HTTP with a per-request timeout and caches successful
//! routes using `moka` (5-minute TTL by default).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clean_food_core::{Coordinate, RoutingProfile, VehicleProfile};
use moka::future::Cache;
use tracing::{debug, instrument, warn};
use url::Url;

use super::types::{OsrmErrorBody, OsrmResponse, RouteResult};
use super::{RoadRouter, RoutingError, adjust_duration};
use crate::config::RoutingConfig;

/// Longest body excerpt included in logs.
const LOG_BODY_CHARS: usize = 500;

/// Client for an OSRM-compatible routing service.
///
/// Cheap to clone; clones share the HTTP connection pool and route cache.
#[derive(Clone)]
pub struct OsrmClient {
    inner: Arc<OsrmClientInner>,
}

struct OsrmClientInner {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    /// Routes as returned by the provider, before vehicle adjustments.
    cache: Cache<String, RouteResult>,
}

impl OsrmClient {
    /// Create a new routing client.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::Client` if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        Url::parse(&config.base_url).map_err(|e| {
            RoutingError::Client(format!("invalid base URL {}: {e}", config.base_url))
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RoutingError::Client(e.to_string()))?;

        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(OsrmClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                timeout: config.timeout,
                cache,
            }),
        })
    }

    /// Build the request URL for a route.
    ///
    /// Positions are written `longitude,latitude`, as OSRM expects.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::Client` if the resulting URL does not parse.
    pub fn route_url(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: RoutingProfile,
    ) -> Result<Url, RoutingError> {
        let raw = format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.inner.base_url,
            profile.as_str(),
            origin.longitude(),
            origin.latitude(),
            destination.longitude(),
            destination.latitude(),
        );
        let mut url = Url::parse(&raw).map_err(|e| RoutingError::Client(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("overview", "full")
            .append_pair("geometries", "geojson");
        Ok(url)
    }

    /// Fetch a route for a routing profile, consulting the cache first.
    async fn fetch(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: RoutingProfile,
    ) -> Result<RouteResult, RoutingError> {
        let cache_key = format!("{profile}:{origin};{destination}");

        // Check cache
        if let Some(route) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for route");
            return Ok(route);
        }

        let url = self.route_url(origin, destination, profile)?;
        let response = self
            .inner
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        if !status.is_success() {
            warn!(
                status = %status,
                body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
                "Routing provider returned non-success status"
            );
            // OSRM reports NoRoute, InvalidQuery etc. with 400 and a JSON body
            return Err(match serde_json::from_str::<OsrmErrorBody>(&body) {
                Ok(error) => RoutingError::Provider {
                    code: error.code,
                    message: error.message.unwrap_or_default(),
                },
                Err(_) => RoutingError::HttpStatus(status.as_u16()),
            });
        }

        let route = parse_route(&body, profile)?;

        self.inner.cache.insert(cache_key, route.clone()).await;

        Ok(route)
    }

    fn map_transport_error(&self, error: &reqwest::Error) -> RoutingError {
        if error.is_timeout() {
            #[allow(clippy::cast_possible_truncation)] // Timeouts are configured in ms
            RoutingError::Timeout(self.inner.timeout.as_millis() as u64)
        } else {
            RoutingError::Transport(error.to_string())
        }
    }

    /// Drop every cached route.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

#[async_trait]
impl RoadRouter for OsrmClient {
    #[instrument(skip(self), fields(origin = %origin, destination = %destination, vehicle = %vehicle))]
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        vehicle: VehicleProfile,
    ) -> Result<RouteResult, RoutingError> {
        let mut route = self
            .fetch(origin, destination, vehicle.routing_profile())
            .await
            .inspect_err(|e| warn!(error = %e, "Routing request failed"))?;

        route.duration_min = adjust_duration(vehicle, route.distance_km, route.duration_min);
        route.vehicle = vehicle;
        Ok(route)
    }
}

/// Turn a 2xx provider body into a route.
fn parse_route(body: &str, profile: RoutingProfile) -> Result<RouteResult, RoutingError> {
    let response: OsrmResponse = serde_json::from_str(body).map_err(|e| {
        warn!(
            error = %e,
            body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
            "Failed to parse routing response"
        );
        RoutingError::MalformedPayload(e.to_string())
    })?;

    if response.code != "Ok" {
        return Err(RoutingError::Provider {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(RoutingError::NoRoute)?;

    if !route.distance.is_finite()
        || !route.duration.is_finite()
        || route.distance < 0.0
        || route.duration < 0.0
    {
        return Err(RoutingError::MalformedPayload(format!(
            "invalid distance {} m / duration {} s",
            route.distance, route.duration
        )));
    }

    Ok(RouteResult {
        distance_km: route.distance / 1000.0,
        duration_min: route.duration / 60.0,
        geometry: route.geometry,
        profile,
        vehicle: VehicleProfile::Car,
    })
}
