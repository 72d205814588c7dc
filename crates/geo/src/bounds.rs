//! Bounding boxes for map-viewport search.

use crate::{Coordinate, GeoError, Result};

/// An axis-aligned geographic bounding box.
///
/// Boxes that span the antimeridian are not supported; `try_new` rejects
/// them.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl BoundingBox {
    /// Creates a bounding box from its south-west and north-east corners.
    pub fn try_new(south_west: Coordinate, north_east: Coordinate) -> Result<Self> {
        if !south_west.is_valid() || !north_east.is_valid() {
            return Err(GeoError::InvalidBounds(format!(
                "corner out of range: sw=({}, {}), ne=({}, {})",
                south_west.latitude, south_west.longitude,
                north_east.latitude, north_east.longitude,
            )));
        }
        if south_west.latitude > north_east.latitude
            || south_west.longitude > north_east.longitude
        {
            return Err(GeoError::InvalidBounds(
                "south-west corner must be south and west of north-east corner".to_string(),
            ));
        }
        Ok(Self { south_west, north_east })
    }

    /// Returns true if `point` lies inside the box (inclusive).
    pub fn contains(&self, point: &Coordinate) -> bool {
        point.latitude >= self.south_west.latitude
            && point.latitude <= self.north_east.latitude
            && point.longitude >= self.south_west.longitude
            && point.longitude <= self.north_east.longitude
    }

    pub fn min_lat(&self) -> f64 {
        self.south_west.latitude
    }

    pub fn max_lat(&self) -> f64 {
        self.north_east.latitude
    }

    pub fn min_lng(&self) -> f64 {
        self.south_west.longitude
    }

    pub fn max_lng(&self) -> f64 {
        self.north_east.longitude
    }
}
