use serde::{Deserialize, Serialize};

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClinicInfo {
    pub name: &'static str,
    pub street: &'static str,
    pub city: &'static str,
    pub postal_code: &'static str,
    pub phones: [&'static str; 2],
    pub email: &'static str,
    pub hours: [(&'static str, &'static str); 3],
    pub location: Coordinates,
}

pub const CLINIC: ClinicInfo = ClinicInfo {
    name: "PhysioHealth Clinic",
    street: "123 Health Avenue, Medical District",
    city: "Bangalore, Karnataka",
    postal_code: "560001",
    phones: ["+91 98765 43210", "+91 80123 45678"],
    email: "contact@physiohealth.com",
    hours: [
        ("Monday - Friday", "9:00 AM - 8:00 PM"),
        ("Saturday", "9:00 AM - 2:00 PM"),
        ("Sunday", "Closed"),
    ],
    location: Coordinates::new(12.9716, 77.5946),
};

impl ClinicInfo {
    /// Google Maps driving directions to the clinic. Does not depend on the user's position.
    pub fn directions_url(&self) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}&travelmode=driving",
            self.location.latitude, self.location.longitude
        )
    }
}
