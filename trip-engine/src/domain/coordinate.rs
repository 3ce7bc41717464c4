//! Geographic coordinate type.

use std::fmt;

use haversine::{Location, Units};
use serde::{Deserialize, Serialize};

use super::DomainError;

/// A WGS-84 position in decimal degrees.
///
/// Latitude is always within `-90..=90` and longitude within `-180..=180`.
/// This type guarantees that any `Coordinate` value is valid by construction.
///
/// # Examples
///
/// ```
/// use trip_engine::domain::Coordinate;
///
/// let london = Coordinate::new(51.5074, -0.1278).unwrap();
/// assert_eq!(london.latitude(), 51.5074);
///
/// // Out of range is rejected
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, 181.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

/// Unvalidated wire form of a coordinate.
#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = DomainError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    /// Create a coordinate, validating the WGS-84 ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(DomainError::InvalidCoordinate {
                lat,
                lon,
                reason: "must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::InvalidCoordinate {
                lat,
                lon,
                reason: "latitude must be within -90..=90",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(DomainError::InvalidCoordinate {
                lat,
                lon,
                reason: "longitude must be within -180..=180",
            });
        }
        Ok(Self { lat, lon })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to another coordinate, in metres.
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        let km = haversine::distance(self.location(), other.location(), Units::Kilometers);
        km * 1000.0
    }

    fn location(&self) -> Location {
        Location {
            latitude: self.lat,
            longitude: self.lon,
        }
    }

    /// Integer grid key with `digits` decimal places, for hashing.
    pub fn quantized(&self, digits: i32) -> (i64, i64) {
        let scale = 10f64.powi(digits);
        (
            (self.lat * scale).round() as i64,
            (self.lon * scale).round() as i64,
        )
    }

    /// Midpoint of two coordinates, taking the short way round in longitude.
    ///
    /// Good enough for picking a traffic region between two points of a
    /// city trip; not a true geodesic midpoint.
    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        let mut d_lon = other.lon - self.lon;
        if d_lon > 180.0 {
            d_lon -= 360.0;
        } else if d_lon < -180.0 {
            d_lon += 360.0;
        }

        let mut lon = self.lon + d_lon / 2.0;
        if lon > 180.0 {
            lon -= 360.0;
        } else if lon < -180.0 {
            lon += 360.0;
        }

        Coordinate {
            lat: (self.lat + other.lat) / 2.0,
            lon,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundaries() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinate::new(90.0001, 0.0).is_err());
        assert!(Coordinate::new(-90.0001, 0.0).is_err());
        assert!(Coordinate::new(0.0, 180.0001).is_err());
        assert!(Coordinate::new(0.0, -180.0001).is_err());
    }

    #[test]
    fn rejects_nan() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let c = Coordinate::new(39.9042, 116.4074).unwrap();
        assert_eq!(c.distance_m(&c), 0.0);
    }

    #[test]
    fn distance_one_degree_latitude() {
        let a = Coordinate::new(0.0, 0.0).unwrap();
        let b = Coordinate::new(1.0, 0.0).unwrap();
        let d = a.distance_m(&b);
        // One degree of latitude is ~111.2 km
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(51.5074, -0.1278).unwrap();
        let b = Coordinate::new(51.5308, -0.1238).unwrap();
        assert!((a.distance_m(&b) - b.distance_m(&a)).abs() < 1e-9);
    }

    #[test]
    fn midpoint_is_between() {
        let a = Coordinate::new(10.0, 20.0).unwrap();
        let b = Coordinate::new(12.0, 24.0).unwrap();
        let m = a.midpoint(&b);
        assert_eq!(m.latitude(), 11.0);
        assert_eq!(m.longitude(), 22.0);
    }

    #[test]
    fn midpoint_across_antimeridian() {
        let east = Coordinate::new(0.0, 179.9).unwrap();
        let west = Coordinate::new(0.0, -179.9).unwrap();

        for m in [east.midpoint(&west), west.midpoint(&east)] {
            assert_eq!(m.latitude(), 0.0);
            assert!((m.longitude().abs() - 180.0).abs() < 1e-9, "got {m}");
            assert!(east.distance_m(&m) < east.distance_m(&west));
        }
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<Coordinate, _> = serde_json::from_str(r#"{"lat": 51.5, "lon": -0.1}"#);
        assert!(ok.is_ok());

        let bad: Result<Coordinate, _> = serde_json::from_str(r#"{"lat": 123.0, "lon": 0.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn quantized_groups_nearby_points() {
        let a = Coordinate::new(51.50741, -0.12781).unwrap();
        let b = Coordinate::new(51.50744, -0.12779).unwrap();
        assert_eq!(a.quantized(4), b.quantized(4));
        assert_ne!(a.quantized(6), b.quantized(6));
        assert_eq!(a.quantized(2), (5151, -13));
    }

    #[test]
    fn display_format() {
        let c = Coordinate::new(51.5, -0.125).unwrap();
        assert_eq!(c.to_string(), "51.500000,-0.125000");
    }
}
