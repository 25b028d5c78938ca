//! Shipping fee calculation.

use clean_food_core::Vnd;
use serde::{Deserialize, Serialize};

/// Default flat fee charged on every delivery.
pub const DEFAULT_BASE_FEE: Vnd = Vnd::new(15_000);

/// Default fee per routed kilometer.
pub const DEFAULT_PER_KM_FEE: Vnd = Vnd::new(5_000);

/// Cap applied to fees computed during order assignment.
pub const ASSIGNMENT_FEE_CAP: Vnd = Vnd::new(50_000);

/// Base + per-km pricing with an optional ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub base_fee: Vnd,
    pub per_km_fee: Vnd,
    pub cap: Option<Vnd>,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            base_fee: DEFAULT_BASE_FEE,
            per_km_fee: DEFAULT_PER_KM_FEE,
            cap: None,
        }
    }
}

impl FeeSchedule {
    /// The same schedule with a different cap.
    #[must_use]
    pub const fn with_cap(mut self, cap: Option<Vnd>) -> Self {
        self.cap = cap;
        self
    }

    /// Price a delivery of `distance_km`. See [`compute_fee`].
    #[must_use]
    pub fn compute(&self, distance_km: f64) -> ShippingFee {
        compute_fee(distance_km, self)
    }
}

/// Breakdown of a computed shipping fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingFee {
    pub base_fee: Vnd,
    /// Distance component before any cap.
    pub distance_fee: Vnd,
    pub total: Vnd,
    pub cap_applied: bool,
}

/// Compute `base_fee + distance_km * per_km_fee`, truncated to whole đồng and
/// clamped to the schedule's cap.
///
/// Negative or non-finite distances are priced as zero kilometers.
///
/// # Example
///
/// ```
/// use clean_food_delivery::fee::{FeeSchedule, compute_fee};
///
/// let fee = compute_fee(10.0, &FeeSchedule::default());
/// assert_eq!(fee.total.as_i64(), 65_000);
/// ```
#[must_use]
pub fn compute_fee(distance_km: f64, schedule: &FeeSchedule) -> ShippingFee {
    let distance_km = if distance_km.is_finite() {
        distance_km.max(0.0)
    } else {
        0.0
    };

    let raw = schedule.per_km_fee.as_f64().mul_add(distance_km, schedule.base_fee.as_f64());
    #[allow(clippy::cast_possible_truncation)] // Truncation to whole đồng is the pricing rule
    let uncapped = Vnd::new(raw.trunc() as i64);

    let (total, cap_applied) = match schedule.cap {
        Some(cap) if uncapped > cap => (cap, true),
        _ => (uncapped, false),
    };

    ShippingFee {
        base_fee: schedule.base_fee,
        distance_fee: uncapped - schedule.base_fee,
        total,
        cap_applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_kilometers() {
        let fee = compute_fee(10.0, &FeeSchedule::default());
        assert_eq!(fee.total, Vnd::new(65_000));
        assert_eq!(fee.base_fee, Vnd::new(15_000));
        assert_eq!(fee.distance_fee, Vnd::new(50_000));
        assert!(!fee.cap_applied);
    }

    #[test]
    fn test_truncates_fractional_dong() {
        let schedule = FeeSchedule {
            base_fee: Vnd::new(15_000),
            per_km_fee: Vnd::new(5_000),
            cap: None,
        };
        // 15_000 + 1.23457 * 5_000 = 21_172.85
        assert_eq!(compute_fee(1.23457, &schedule).total, Vnd::new(21_172));
    }

    #[test]
    fn test_cap_clamps_total() {
        let schedule = FeeSchedule::default().with_cap(Some(ASSIGNMENT_FEE_CAP));
        let fee = compute_fee(12.0, &schedule);
        assert_eq!(fee.total, Vnd::new(50_000));
        assert!(fee.cap_applied);
        assert_eq!(fee.distance_fee, Vnd::new(60_000));
    }

    #[test]
    fn test_exactly_at_cap_is_not_capped() {
        let schedule = FeeSchedule::default().with_cap(Some(ASSIGNMENT_FEE_CAP));
        let fee = compute_fee(7.0, &schedule);
        assert_eq!(fee.total, Vnd::new(50_000));
        assert!(!fee.cap_applied);
    }

    #[test]
    fn test_monotonic_up_to_cap() {
        let schedule = FeeSchedule::default().with_cap(Some(ASSIGNMENT_FEE_CAP));
        let mut previous = compute_fee(0.0, &schedule).total;
        for step in 1..=400 {
            let d = f64::from(step) * 0.05;
            let fee = compute_fee(d, &schedule);
            assert!(fee.total >= previous, "fee decreased at {d} km");
            assert!(fee.total <= ASSIGNMENT_FEE_CAP);
            if fee.cap_applied {
                assert_eq!(fee.total, ASSIGNMENT_FEE_CAP);
            }
            previous = fee.total;
        }
    }

    #[test]
    fn test_invalid_distances_price_as_zero() {
        let schedule = FeeSchedule::default();
        assert_eq!(compute_fee(-3.0, &schedule).total, Vnd::new(15_000));
        assert_eq!(compute_fee(f64::NAN, &schedule).total, Vnd::new(15_000));
    }

    #[test]
    fn test_idempotent() {
        let schedule = FeeSchedule::default().with_cap(Some(ASSIGNMENT_FEE_CAP));
        assert_eq!(compute_fee(4.37, &schedule), compute_fee(4.37, &schedule));
    }
}
