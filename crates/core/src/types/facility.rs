//! Supply facilities and delivery zones.

use serde::{Deserialize, Serialize};

use super::{Coordinate, FacilityId, Vnd};

/// A store or farm that can fulfil orders.
///
/// Facilities without a coordinate are skipped by every distance computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub organic_certified: bool,
}

impl Facility {
    /// Create a facility with a known location.
    #[must_use]
    pub fn new(id: FacilityId, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id,
            name: name.into(),
            coordinate: Some(coordinate),
            organic_certified: false,
        }
    }

    /// Create a facility whose location has not been entered yet.
    #[must_use]
    pub fn unlocated(id: FacilityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            coordinate: None,
            organic_certified: false,
        }
    }

    /// Mark the facility as organic certified.
    #[must_use]
    pub const fn certified(mut self) -> Self {
        self.organic_certified = true;
        self
    }
}

/// A named serviceable region with a default fee and delivery time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryZone {
    pub name: String,
    #[serde(default)]
    pub area_description: String,
    pub fee_default: Vnd,
    pub time_description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}
