//! Geospatial primitives for Atlas search.
//!
//! This crate provides:
//! - Validated latitude/longitude coordinates
//! - Haversine great-circle distances
//! - Distance unit conversions (the search index reports meters, the app
//!   surfaces kilometers and miles)
//! - Bounding boxes for map-viewport search filters
//!
//! # Example
//!
//! ```
//! use atlas_geo::{haversine_distance, Coordinate};
//!
//! let sf = Coordinate::new(37.7749, -122.4194);
//! let la = Coordinate::new(34.0522, -118.2437);
//!
//! let distance_km = haversine_distance(&sf, &la);
//! assert!((distance_km - 559.0).abs() < 5.0);
//! ```

mod bounds;
mod error;
mod haversine;
mod units;

pub use bounds::BoundingBox;
pub use error::{GeoError, Result};
pub use haversine::{haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use units::{km_to_miles, meters_to_km, METERS_PER_KM, METERS_PER_MILE};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate without validating the values.
    ///
    /// Use [`Coordinate::try_new`] at input boundaries where the values come
    /// from users or remote documents.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting out-of-range values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self { latitude, longitude };
        if !coord.is_valid() {
            return Err(GeoError::InvalidCoordinate(format!(
                "latitude {latitude}, longitude {longitude}"
            )));
        }
        Ok(coord)
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Returns a copy with both components rounded to `decimals` places.
    ///
    /// Cache keys round to 2 decimals (~1.1 km) so small GPS jitter maps to
    /// the same key.
    pub fn rounded(&self, decimals: u32) -> Self {
        let factor = 10f64.powi(decimals as i32);
        Self {
            latitude: (self.latitude * factor).round() / factor,
            longitude: (self.longitude * factor).round() / factor,
        }
    }

    /// Great-circle distance to `other` in kilometers.
    #[inline]
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_distance(self, other)
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(37.7749, -122.4194);
        assert_eq!(coord.latitude, 37.7749);
        assert_eq!(coord.longitude, -122.4194);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert!(Coordinate::try_new(37.7749, -122.4194).is_ok());
        assert!(Coordinate::try_new(-91.0, 0.0).is_err());
        assert!(Coordinate::try_new(0.0, 200.0).is_err());
    }

    #[test]
    fn test_rounded_two_decimals() {
        let coord = Coordinate::new(37.77491234, -122.41945678);
        let rounded = coord.rounded(2);
        assert_eq!(rounded.latitude, 37.77);
        assert_eq!(rounded.longitude, -122.42);
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (37.7749, -122.4194).into();
        assert_eq!(coord.latitude, 37.7749);
    }
}
