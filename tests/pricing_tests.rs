use physiohealth_bot::features::pricing::{quote, REGULAR_PATIENT_DISCOUNT_PERCENT};
use physiohealth_bot::models::{Service, DEFAULT_BASE_PRICE};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[cfg(test)]
mod quote_tests {
    use super::*;

    #[test]
    fn test_sports_regular_patient() {
        let q = quote("sports", true);
        assert_eq!(q.base_price, 2000.0);
        assert_eq!(q.discount, 600.0);
        assert_eq!(q.final_price, 1400.0);
        assert!(q.has_discount());
    }

    #[test]
    fn test_new_patient_pays_base_price() {
        let q = quote("pediatric", false);
        assert_eq!(q.base_price, 1200.0);
        assert_eq!(q.discount, 0.0);
        assert_eq!(q.final_price, 1200.0);
        assert!(!q.has_discount());
    }

    #[test]
    fn test_every_service_and_flag() {
        for service in Service::all() {
            let base = f64::from(service.price);
            for regular in [false, true] {
                let q = quote(service.id, regular);
                let factor = if regular { 0.7 } else { 1.0 };

                assert_eq!(q.base_price, base);
                assert_close(q.final_price, base * factor);
                assert_close(q.discount, if regular { base * 0.3 } else { 0.0 });
                assert_close(q.base_price - q.discount, q.final_price);
            }
        }
    }

    #[test]
    fn test_unknown_service_uses_default_price() {
        assert_eq!(DEFAULT_BASE_PRICE, 1500);

        let q = quote("acupuncture", false);
        assert_eq!(q.base_price, 1500.0);
        assert_eq!(q.final_price, 1500.0);

        let q = quote("", true);
        assert_eq!(q.base_price, 1500.0);
        assert_eq!(q.discount, 450.0);
        assert_eq!(q.final_price, 1050.0);
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(REGULAR_PATIENT_DISCOUNT_PERCENT, 30);
    }

    #[test]
    fn test_quote_is_deterministic() {
        assert_eq!(quote("home", true), quote("home", true));
    }
}
