//! Distance unit conversions.
//!
//! The search index reports geo distances in meters. The app surfaces
//! kilometers everywhere except US place listings, which show miles.

/// Meters per kilometer.
pub const METERS_PER_KM: f64 = 1_000.0;

/// Meters per statute mile.
pub const METERS_PER_MILE: f64 = 1_609.34;

/// Converts meters to kilometers.
#[inline]
pub fn meters_to_km(meters: f64) -> f64 {
    meters / METERS_PER_KM
}

/// Converts kilometers to miles.
#[inline]
pub fn km_to_miles(km: f64) -> f64 {
    km * METERS_PER_KM / METERS_PER_MILE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_km() {
        assert_eq!(meters_to_km(1500.0), 1.5);
        assert_eq!(meters_to_km(0.0), 0.0);
    }

    #[test]
    fn test_km_to_miles() {
        let miles = km_to_miles(10.0);
        assert!((miles - 6.2137).abs() < 0.001);
    }
}
