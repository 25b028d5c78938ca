//! Straight-line geometry on the Earth's surface.
//!
//! Distances use the Haversine great-circle formula. They ignore roads, so
//! they are a lower bound on what a courier actually drives.

use clean_food_core::Coordinate;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers, rounded to
/// two decimal places.
///
/// Symmetric, and zero for identical points.
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    round2(haversine_km(a, b))
}

fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Round to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Even-odd ray-casting test: is `point` inside the polygon `ring`?
///
/// The ring may be open or closed (first vertex repeated at the end). Points
/// exactly on an edge may land on either side.
#[must_use]
pub fn ring_contains(ring: &[Coordinate], point: Coordinate) -> bool {
    let Some(&last) = ring.last() else {
        return false;
    };
    if ring.len() < 3 {
        return false;
    }

    let x = point.longitude();
    let y = point.latitude();
    let mut inside = false;

    let mut previous = last;
    for &current in ring {
        let (xi, yi) = (current.longitude(), current.latitude());
        let (xj, yj) = (previous.longitude(), previous.latitude());

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        previous = current;
    }

    inside
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_identical_points_are_zero() {
        let p = c(10.8231, 106.6297);
        assert!(distance_km(p, p).abs() < f64::EPSILON);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = distance_km(c(10.0, 106.0), c(11.0, 106.0));
        assert!((d - 111.2).abs() < 111.2 * 0.01, "got {d}");
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            (c(10.762622, 106.660172), c(11.9404, 108.4583)),
            (c(-33.8688, 151.2093), c(51.5074, -0.1278)),
            (c(0.0, 179.9), c(0.0, -179.9)),
        ];
        for (a, b) in pairs {
            assert!((distance_km(a, b) - distance_km(b, a)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_rounded_to_two_decimals() {
        let d = distance_km(c(10.762622, 106.660172), c(10.8231, 106.6297));
        assert!(((d * 100.0).round() - d * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_idempotent() {
        let a = c(10.1, 106.2);
        let b = c(10.4, 106.9);
        assert!((distance_km(a, b) - distance_km(a, b)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ring_contains() {
        let square = [
            c(10.5, 106.4),
            c(10.5, 106.9),
            c(11.0, 106.9),
            c(11.0, 106.4),
            c(10.5, 106.4),
        ];
        assert!(ring_contains(&square, c(10.76, 106.66)));
        assert!(!ring_contains(&square, c(11.2, 106.66)));
        assert!(!ring_contains(&square, c(10.76, 107.1)));
    }

    #[test]
    fn test_degenerate_ring_contains_nothing() {
        let line = [c(10.0, 106.0), c(11.0, 107.0)];
        assert!(!ring_contains(&line, c(10.5, 106.5)));
    }
}
