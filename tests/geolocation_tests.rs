use physiohealth_bot::features::geolocation::{
    haversine_km, DistanceReport, DistanceReporter, GeolocationError,
};
use physiohealth_bot::models::{Coordinates, CLINIC};

fn mg_road() -> Coordinates {
    Coordinates::new(12.9756, 77.6066)
}

fn whitefield() -> Coordinates {
    Coordinates::new(12.9698, 77.7500)
}

#[cfg(test)]
mod haversine_tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(haversine_km(CLINIC.location, CLINIC.location), 0.0);
        assert_eq!(haversine_km(whitefield(), whitefield()), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let there = haversine_km(CLINIC.location, whitefield());
        let back = haversine_km(whitefield(), CLINIC.location);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // 6371 * pi / 180
        let d = haversine_km(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_across_town() {
        let d = haversine_km(CLINIC.location, whitefield());
        assert!(d > 16.0 && d < 17.5, "got {}", d);
    }
}

#[cfg(test)]
mod reporter_tests {
    use super::*;

    #[test]
    fn test_default_reference_is_clinic() {
        assert_eq!(DistanceReporter::default().reference(), Coordinates::new(12.9716, 77.5946));
    }

    #[test]
    fn test_report_summary_has_one_decimal() {
        let report = DistanceReporter::default().report(Ok(mg_road())).unwrap();
        assert_eq!(report.user, mg_road());
        assert_eq!(report.summary(), format!("Our clinic is {:.1} km away from you", report.distance_km));
        assert!(report.distance_km > 1.0 && report.distance_km < 2.0);
    }

    #[test]
    fn test_summary_rounding() {
        let report = DistanceReport {
            user: mg_road(),
            distance_km: 3.249,
        };
        assert_eq!(report.summary(), "Our clinic is 3.2 km away from you");
    }

    #[test]
    fn test_errors_pass_through() {
        let reporter = DistanceReporter::default();
        assert_eq!(
            reporter.report(Err(GeolocationError::PermissionDenied)),
            Err(GeolocationError::PermissionDenied)
        );
        assert_eq!(
            reporter.report(Err(GeolocationError::Unsupported)),
            Err(GeolocationError::Unsupported)
        );
    }

    #[test]
    fn test_alert_texts() {
        assert_eq!(
            GeolocationError::PermissionDenied.alert(),
            "Unable to get your location. Please enable location services."
        );
        assert_eq!(
            GeolocationError::Unsupported.to_string(),
            "Location sharing is not supported in this chat."
        );
    }

    #[test]
    fn test_directions_ignore_distance() {
        assert_eq!(
            CLINIC.directions_url(),
            "https://www.google.com/maps/dir/?api=1&destination=12.9716,77.5946&travelmode=driving"
        );
    }
}
