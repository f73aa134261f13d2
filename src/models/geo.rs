// src/models/geo.rs
// DOCUMENTATION: Geographic value types
// PURPOSE: Coordinates and regions used to frame the map and scope searches

use crate::errors::NearbyError;
use geo_types::{coord, Point, Rect};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Approximate length of one degree of latitude in meters
const METERS_PER_DEGREE: f64 = 111_000.0;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A point on Earth in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Coordinate {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl Coordinate {
    /// Create a validated coordinate
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, NearbyError> {
        // Range checks pass NaN through
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(NearbyError::InvalidInput(format!(
                "coordinate must be finite: ({}, {})",
                latitude, longitude
            )));
        }

        let coordinate = Coordinate {
            latitude,
            longitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Great-circle distance to another coordinate in meters
    /// Uses Haversine formula
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);

        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(c: Coordinate) -> Self {
        Point::new(c.longitude, c.latitude)
    }
}

/// Geographic viewport: a center plus a radius in meters
/// DOCUMENTATION: Scopes searches and frames the visible map.
/// The framed area is a square twice the radius across.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Region {
    #[validate]
    pub center: Coordinate,

    #[validate(range(min = 1.0, max = 50000.0))]
    pub radius_m: f64,
}

impl Region {
    pub fn new(center: Coordinate, radius_m: f64) -> Result<Self, NearbyError> {
        if !radius_m.is_finite() {
            return Err(NearbyError::InvalidInput(format!(
                "radius must be finite: {}",
                radius_m
            )));
        }

        let region = Region { center, radius_m };
        region.validate()?;
        Ok(region)
    }

    /// Latitude/longitude half-spans in degrees
    pub fn half_span_degrees(&self) -> (f64, f64) {
        let lat_delta = self.radius_m / METERS_PER_DEGREE;
        // Longitude degrees shrink toward the poles
        let cos_lat = self.center.latitude.to_radians().cos().max(0.01);
        let lon_delta = self.radius_m / (METERS_PER_DEGREE * cos_lat);
        (lat_delta, lon_delta)
    }

    /// Bounding box of the framed viewport (x = longitude, y = latitude)
    pub fn bounding_rect(&self) -> Rect<f64> {
        let (lat_delta, lon_delta) = self.half_span_degrees();
        Rect::new(
            coord! {
                x: self.center.longitude - lon_delta,
                y: (self.center.latitude - lat_delta).max(-90.0),
            },
            coord! {
                x: self.center.longitude + lon_delta,
                y: (self.center.latitude + lat_delta).min(90.0),
            },
        )
    }

    /// Whether a coordinate falls inside the framed viewport
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        let rect = self.bounding_rect();
        let (min, max) = (rect.min(), rect.max());
        coordinate.longitude >= min.x
            && coordinate.longitude <= max.x
            && coordinate.latitude >= min.y
            && coordinate.latitude <= max.y
    }
}
