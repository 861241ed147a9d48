use std::fmt;

use crate::models::{Coordinates, CLINIC};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres on a spherical Earth.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    PermissionDenied,
    Unsupported,
}

impl GeolocationError {
    /// Text of the blocking alert shown to the user.
    pub fn alert(&self) -> &'static str {
        match self {
            GeolocationError::PermissionDenied => {
                "Unable to get your location. Please enable location services."
            }
            GeolocationError::Unsupported => "Location sharing is not supported in this chat.",
        }
    }
}

impl fmt::Display for GeolocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alert())
    }
}

impl std::error::Error for GeolocationError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceReport {
    pub user: Coordinates,
    pub distance_km: f64,
}

impl DistanceReport {
    pub fn summary(&self) -> String {
        format!("Our clinic is {:.1} km away from you", self.distance_km)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DistanceReporter {
    reference: Coordinates,
}

impl Default for DistanceReporter {
    fn default() -> Self {
        Self::new(CLINIC.location)
    }
}

impl DistanceReporter {
    pub fn new(reference: Coordinates) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> Coordinates {
        self.reference
    }

    /// Turns the outcome of a position request into a distance report.
    pub fn report(
        &self,
        position: Result<Coordinates, GeolocationError>,
    ) -> Result<DistanceReport, GeolocationError> {
        let user = position?;
        Ok(DistanceReport {
            user,
            distance_km: haversine_km(user, self.reference),
        })
    }
}
