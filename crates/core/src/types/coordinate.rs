//! Geographic coordinate type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Coordinate`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    /// Latitude or longitude is NaN or infinite.
    #[error("coordinate components must be finite numbers")]
    NotFinite,
    /// Latitude is outside [-90, 90].
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude is outside [-180, 180].
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A WGS84 latitude/longitude pair in decimal degrees.
///
/// Coordinates can only be built through [`Coordinate::new`] (or deserialized,
/// which runs the same checks), so every value in circulation is in range.
///
/// ## Constraints
///
/// - Latitude: finite, within [-90, 90]
/// - Longitude: finite, within [-180, 180]
///
/// ## Examples
///
/// ```
/// use clean_food_core::Coordinate;
///
/// let saigon = Coordinate::new(10.762622, 106.660172).unwrap();
/// assert_eq!(saigon.latitude(), 10.762622);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Center of Ho Chi Minh City (District 5).
    pub const SAIGON_CENTER: Self = Self {
        latitude: 10.762_622,
        longitude: 106.660_172,
    };

    /// Build a coordinate from latitude and longitude in decimal degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if either component is not finite or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a coordinate from a GeoJSON-style `[longitude, latitude]` position.
    ///
    /// # Errors
    ///
    /// Returns an error if either component is not finite or out of range.
    pub fn from_lon_lat(position: [f64; 2]) -> Result<Self, CoordinateError> {
        let [longitude, latitude] = position;
        Self::new(latitude, longitude)
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// GeoJSON position order: `[longitude, latitude]`.
    #[must_use]
    pub const fn to_lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl core::str::FromStr for Coordinate {
    type Err = CoordinateParseError;

    /// Parse `"lat,lng"` (whitespace around either number is ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or(CoordinateParseError::Format)?;
        let latitude = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateParseError::Format)?;
        let longitude = lng
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateParseError::Format)?;
        Ok(Self::new(latitude, longitude)?)
    }
}

/// Errors that can occur when parsing a [`Coordinate`] from text.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum CoordinateParseError {
    /// Input is not two comma-separated numbers.
    #[error("expected \"latitude,longitude\"")]
    Format,
    /// Input parsed but is not a valid coordinate.
    #[error(transparent)]
    Invalid(#[from] CoordinateError),
}
