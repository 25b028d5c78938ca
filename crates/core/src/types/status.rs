//! Status enums for vehicles and order assignment.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a delivery will travel.
///
/// Accepts the aliases used by storefront forms: `driving`/`car`,
/// `motorcycle`/`motorbike`, `bicycle`/`bike`, `foot`/`walking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VehicleProfile {
    #[default]
    Car,
    Motorbike,
    Bicycle,
    Foot,
}

impl VehicleProfile {
    /// The routing-provider profile used to compute this vehicle's route.
    ///
    /// Motorbikes share the driving network; their duration is adjusted after
    /// routing.
    #[must_use]
    pub const fn routing_profile(self) -> RoutingProfile {
        match self {
            Self::Car | Self::Motorbike => RoutingProfile::Driving,
            Self::Bicycle => RoutingProfile::Bicycle,
            Self::Foot => RoutingProfile::Foot,
        }
    }

    /// Human-readable label for operator displays.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::Motorbike => "Motorbike",
            Self::Bicycle => "Bicycle",
            Self::Foot => "Walking",
        }
    }
}

/// Error returned when a vehicle name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown vehicle type: {0}")]
pub struct UnknownVehicle(pub String);

impl FromStr for VehicleProfile {
    type Err = UnknownVehicle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" | "car" => Ok(Self::Car),
            "motorcycle" | "motorbike" => Ok(Self::Motorbike),
            "bicycle" | "bike" => Ok(Self::Bicycle),
            "foot" | "walking" => Ok(Self::Foot),
            _ => Err(UnknownVehicle(s.to_string())),
        }
    }
}

impl fmt::Display for VehicleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Travel network understood by the routing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingProfile {
    Driving,
    Bicycle,
    Foot,
}

impl RoutingProfile {
    /// Path segment used in `/route/v1/{profile}/...` requests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Bicycle => "bicycle",
            Self::Foot => "foot",
        }
    }
}

impl fmt::Display for RoutingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an order's supplying facility was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMethod {
    /// No facility could be assigned; the zone default fee applies.
    #[default]
    Unassigned,
    /// Nearest facility by routed road distance.
    Road,
    /// Nearest facility by straight-line distance because routing was unavailable.
    StraightLineFallback,
}

impl AssignmentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::Road => "road",
            Self::StraightLineFallback => "straight_line_fallback",
        }
    }
}

impl fmt::Display for AssignmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_aliases() {
        assert_eq!("driving".parse(), Ok(VehicleProfile::Car));
        assert_eq!("car".parse(), Ok(VehicleProfile::Car));
        assert_eq!("motorcycle".parse(), Ok(VehicleProfile::Motorbike));
        assert_eq!("Motorbike".parse(), Ok(VehicleProfile::Motorbike));
        assert_eq!("bike".parse(), Ok(VehicleProfile::Bicycle));
        assert_eq!("bicycle".parse(), Ok(VehicleProfile::Bicycle));
        assert_eq!("walking".parse(), Ok(VehicleProfile::Foot));
        assert_eq!("foot".parse(), Ok(VehicleProfile::Foot));
        assert!("boat".parse::<VehicleProfile>().is_err());
    }

    #[test]
    fn test_routing_profile_mapping() {
        assert_eq!(VehicleProfile::Car.routing_profile(), RoutingProfile::Driving);
        assert_eq!(
            VehicleProfile::Motorbike.routing_profile(),
            RoutingProfile::Driving
        );
        assert_eq!(
            VehicleProfile::Bicycle.routing_profile(),
            RoutingProfile::Bicycle
        );
        assert_eq!(VehicleProfile::Foot.routing_profile(), RoutingProfile::Foot);
    }

    #[test]
    fn test_routing_profile_path_segment() {
        assert_eq!(RoutingProfile::Driving.to_string(), "driving");
        assert_eq!(RoutingProfile::Foot.as_str(), "foot");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_assignment_method_display_matches_serde() {
        for method in [
            AssignmentMethod::Unassigned,
            AssignmentMethod::Road,
            AssignmentMethod::StraightLineFallback,
        ] {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{method}\""));
        }
    }
}
