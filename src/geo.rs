//! Coordinate value type and great-circle distance on the WGS-84 ellipsoid.

use geo::{GeodesicDistance, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated latitude/longitude pair in decimal degrees.
///
/// Equality is exact bit-for-bit comparison of both components; the photo
/// grouping in [`crate::photos`] relies on this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Latitude or longitude outside the valid range.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidCoordinate {
    pub lat: f64,
    pub lon: f64,
}

impl fmt::Display for InvalidCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid coordinate ({}, {}): lat must be -90..90, lon -180..180",
            self.lat, self.lon
        )
    }
}

impl std::error::Error for InvalidCoordinate {}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinate { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    /// Geodesic surface distance to `other`, in meters.
    pub fn distance_meters(&self, other: &Coordinate) -> f64 {
        let a = Point::new(self.lon, self.lat);
        let b = Point::new(other.lon, other.lat);
        a.geodesic_distance(&b)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// True when `candidate` lies within `radius_meters` of `center`.
///
/// The comparison is exact (`distance <= radius`), not truncated to whole
/// meters first.
pub fn within_radius(center: &Coordinate, candidate: &Coordinate, radius_meters: f64) -> bool {
    center.distance_meters(candidate) <= radius_meters
}
