//! Multi-stop delivery ordering.
//!
//! Greedy nearest neighbour over straight-line distance: from the current
//! position, always go to the closest unvisited stop. Fast and predictable,
//! but not optimal (no backtracking, no 2-opt).

use clean_food_core::{Coordinate, StopId};
use serde::{Deserialize, Serialize};

use crate::geo;

/// A point a courier must visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryStop {
    pub id: StopId,
    pub coordinate: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One hop of an optimized route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    pub stop: DeliveryStop,
    pub distance_from_previous_km: f64,
    pub cumulative_distance_km: f64,
}

/// Stops in visiting order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedRoute {
    pub legs: Vec<RouteLeg>,
    /// Sum of hop distances, rounded to two decimals.
    pub total_distance_km: f64,
}

impl OptimizedRoute {
    pub fn ordered_stops(&self) -> impl Iterator<Item = &DeliveryStop> {
        self.legs.iter().map(|leg| &leg.stop)
    }

    #[must_use]
    pub fn num_stops(&self) -> usize {
        self.legs.len()
    }
}

/// Order `stops` by repeatedly visiting the nearest unvisited one, starting
/// from `start`.
///
/// Ties go to the stop that appears first in `stops`.
#[must_use]
pub fn optimize(start: Coordinate, stops: &[DeliveryStop]) -> OptimizedRoute {
    let mut unvisited: Vec<&DeliveryStop> = stops.iter().collect();
    let mut legs = Vec::with_capacity(stops.len());
    let mut current = start;
    let mut total = 0.0;

    while !unvisited.is_empty() {
        let mut best_index = 0;
        let mut best_distance = f64::INFINITY;
        for (index, stop) in unvisited.iter().enumerate() {
            let distance = geo::distance_km(current, stop.coordinate);
            if distance < best_distance {
                best_index = index;
                best_distance = distance;
            }
        }

        // Vec::remove keeps the remaining order, so later ties still favour
        // earlier input
        let nearest = unvisited.remove(best_index);
        total += best_distance;
        current = nearest.coordinate;

        legs.push(RouteLeg {
            stop: nearest.clone(),
            distance_from_previous_km: best_distance,
            cumulative_distance_km: total,
        });
    }

    OptimizedRoute {
        legs,
        total_distance_km: geo::round2(total),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stop(id: i32, lat: f64, lng: f64) -> DeliveryStop {
        DeliveryStop {
            id: StopId::new(id),
            coordinate: Coordinate::new(lat, lng).unwrap(),
            label: None,
        }
    }

    fn order(route: &OptimizedRoute) -> Vec<i32> {
        route.ordered_stops().map(|s| s.id.as_i32()).collect()
    }

    #[test]
    fn test_empty_stops() {
        let route = optimize(Coordinate::new(10.0, 106.0).unwrap(), &[]);
        assert!(route.legs.is_empty());
        assert_eq!(route.num_stops(), 0);
        assert!(route.total_distance_km.abs() < f64::EPSILON);
    }

    #[test]
    fn test_greedy_order() {
        let start = Coordinate::new(10.0, 106.0).unwrap();
        let stops = vec![
            stop(1, 10.3, 106.0),
            stop(2, 10.1, 106.0),
            stop(3, 10.2, 106.0),
        ];

        let route = optimize(start, &stops);
        assert_eq!(order(&route), vec![2, 3, 1]);
        assert_eq!(route.num_stops(), 3);
    }

    #[test]
    fn test_total_is_sum_of_hops() {
        let start = Coordinate::new(10.76, 106.66).unwrap();
        let stops = vec![
            stop(1, 10.80, 106.70),
            stop(2, 10.85, 106.62),
            stop(3, 10.70, 106.75),
            stop(4, 10.78, 106.68),
        ];

        let route = optimize(start, &stops);
        let sum: f64 = route.legs.iter().map(|l| l.distance_from_previous_km).sum();
        assert!((route.total_distance_km - geo::round2(sum)).abs() < 1e-9);

        let last = route.legs.last().unwrap();
        assert!((last.cumulative_distance_km - sum).abs() < 1e-9);
    }

    #[test]
    fn test_tie_goes_to_first_stop() {
        let start = Coordinate::new(10.0, 106.0).unwrap();
        let stops = vec![stop(5, 10.1, 106.0), stop(6, 9.9, 106.0)];
        let route = optimize(start, &stops);
        assert_eq!(order(&route).first(), Some(&5));
    }

    #[test]
    fn test_every_stop_visited_once() {
        let start = Coordinate::new(10.0, 106.0).unwrap();
        let stops: Vec<_> = (0..8)
            .map(|i| stop(i, 10.0 + f64::from(i) * 0.013, 106.0 - f64::from(i % 3) * 0.02))
            .collect();
        let mut visited = order(&optimize(start, &stops));
        visited.sort_unstable();
        assert_eq!(visited, (0..8).collect::<Vec<_>>());
    }
}
