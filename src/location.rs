use geo::Point;

use crate::error::ConfigurationError;

/// Anything that can tell where it is.
pub trait Geolocation {
    fn latitude(&self) -> f64;
    fn longitude(&self) -> f64;

    fn query_point(&self) -> Result<QueryPoint, ConfigurationError> {
        QueryPoint::new(self.latitude(), self.longitude())
    }
}

/// A validated position to search around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryPoint(Point);

impl QueryPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ConfigurationError> {
        let reason = if !latitude.is_finite() || !longitude.is_finite() {
            Some("coordinates must be finite")
        } else if !(-90.0..=90.0).contains(&latitude) {
            Some("latitude out of range")
        } else if !(-180.0..=180.0).contains(&longitude) {
            Some("longitude out of range")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ConfigurationError::InvalidLocation {
                latitude,
                longitude,
                reason,
            }),
            None => Ok(Self(Point::new(longitude, latitude))),
        }
    }

    pub fn point(self) -> Point {
        self.0
    }
}

impl Geolocation for QueryPoint {
    fn latitude(&self) -> f64 {
        self.0.y()
    }

    fn longitude(&self) -> f64 {
        self.0.x()
    }

    fn query_point(&self) -> Result<QueryPoint, ConfigurationError> {
        Ok(*self)
    }
}

impl Geolocation for Point {
    fn latitude(&self) -> f64 {
        self.y()
    }

    fn longitude(&self) -> f64 {
        self.x()
    }
}
