//! Nearest-facility search.
//!
//! Two modes:
//! - straight line: Haversine distance to every located facility
//! - road: one routing call per located facility, failures skipped
//!
//! Both keep facilities within the distance ceiling, sort ascending by
//! distance (stable, so ties keep input order) and truncate to the limit.

use std::sync::Arc;

use clean_food_core::{Coordinate, Facility, FacilityId, VehicleProfile};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::geo;
use crate::routing::{RoadRouter, RouteGeometry, RoutingError};

/// Ceilings at or above this value mean "no ceiling".
pub const UNLIMITED_DISTANCE_KM: f64 = 99_999.0;

/// How distances are measured when ranking facilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    StraightLine,
    Road(VehicleProfile),
}

/// Road details attached to a road-ranked facility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRoute {
    pub duration_min: f64,
    pub geometry: RouteGeometry,
    pub vehicle: VehicleProfile,
}

/// A facility paired with its distance from the customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFacility {
    pub facility: Facility,
    pub distance_km: f64,
    /// Present when ranked by road.
    pub route: Option<RankedRoute>,
}

/// Road ranking plus what happened to each candidate.
#[derive(Debug, Clone, Default)]
pub struct RoadRanking {
    /// Routed facilities within the ceiling, nearest first.
    pub ranked: Vec<RankedFacility>,
    /// Candidates the provider routed successfully, including those beyond
    /// the ceiling.
    pub routed: usize,
    /// Candidates the provider could not route.
    pub failures: Vec<(FacilityId, RoutingError)>,
}

impl RoadRanking {
    /// True when there were candidates but none could be routed.
    #[must_use]
    pub fn routing_unavailable(&self) -> bool {
        self.routed == 0 && !self.failures.is_empty()
    }
}

fn within_ceiling(distance_km: f64, max_distance_km: f64) -> bool {
    max_distance_km >= UNLIMITED_DISTANCE_KM || distance_km <= max_distance_km
}

fn sort_and_truncate(ranked: &mut Vec<RankedFacility>, limit: usize) {
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(limit);
}

/// Rank facilities by straight-line distance to `customer`.
///
/// Facilities without a coordinate are skipped.
#[must_use]
pub fn rank_straight_line(
    facilities: &[Facility],
    customer: Coordinate,
    max_distance_km: f64,
    limit: usize,
) -> Vec<RankedFacility> {
    let mut ranked: Vec<RankedFacility> = facilities
        .iter()
        .filter_map(|facility| {
            let coordinate = facility.coordinate?;
            let distance_km = geo::distance_km(coordinate, customer);
            within_ceiling(distance_km, max_distance_km).then(|| RankedFacility {
                facility: facility.clone(),
                distance_km,
                route: None,
            })
        })
        .collect();

    sort_and_truncate(&mut ranked, limit);
    ranked
}

/// Ranks facilities by distance, optionally over the road network.
#[derive(Clone)]
pub struct FacilityLocator {
    router: Arc<dyn RoadRouter>,
    concurrency: usize,
}

impl FacilityLocator {
    /// Create a locator issuing at most `concurrency` routing calls at once.
    #[must_use]
    pub fn new(router: Arc<dyn RoadRouter>, concurrency: usize) -> Self {
        Self {
            router,
            concurrency: concurrency.max(1),
        }
    }

    #[must_use]
    pub fn router(&self) -> &Arc<dyn RoadRouter> {
        &self.router
    }

    /// Find up to `limit` facilities within `max_distance_km` of `customer`.
    ///
    /// Road mode silently skips facilities the provider cannot route; use
    /// [`rank_by_road_detailed`](Self::rank_by_road_detailed) to see them.
    pub async fn find_nearest(
        &self,
        facilities: &[Facility],
        customer: Coordinate,
        max_distance_km: f64,
        limit: usize,
        mode: SearchMode,
    ) -> Vec<RankedFacility> {
        match mode {
            SearchMode::StraightLine => {
                rank_straight_line(facilities, customer, max_distance_km, limit)
            }
            SearchMode::Road(vehicle) => {
                self.rank_by_road_detailed(facilities, customer, max_distance_km, limit, vehicle)
                    .await
                    .ranked
            }
        }
    }

    /// Rank facilities by road distance from each facility to `customer`.
    #[instrument(skip(self, facilities), fields(candidates = facilities.len(), customer = %customer))]
    pub async fn rank_by_road_detailed(
        &self,
        facilities: &[Facility],
        customer: Coordinate,
        max_distance_km: f64,
        limit: usize,
        vehicle: VehicleProfile,
    ) -> RoadRanking {
        let router = &self.router;

        // `buffered` yields in input order, which the stable sort relies on
        let results: Vec<_> = stream::iter(
            facilities
                .iter()
                .filter_map(|f| f.coordinate.map(|coordinate| (f, coordinate))),
        )
        .map(|(facility, coordinate)| async move {
            let result = router.route(coordinate, customer, vehicle).await;
            (facility, result)
        })
        .buffered(self.concurrency)
        .collect()
        .await;

        let mut ranking = RoadRanking::default();
        for (facility, result) in results {
            match result {
                Ok(route) => {
                    ranking.routed += 1;
                    if within_ceiling(route.distance_km, max_distance_km) {
                        ranking.ranked.push(RankedFacility {
                            facility: facility.clone(),
                            distance_km: route.distance_km,
                            route: Some(RankedRoute {
                                duration_min: route.duration_min,
                                geometry: route.geometry,
                                vehicle: route.vehicle,
                            }),
                        });
                    }
                }
                Err(e) => ranking.failures.push((facility.id, e)),
            }
        }

        sort_and_truncate(&mut ranking.ranked, limit);

        debug!(
            routed = ranking.routed,
            failed = ranking.failures.len(),
            kept = ranking.ranked.len(),
            "Road ranking complete"
        );

        ranking
    }
}
