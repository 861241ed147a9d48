use serde::Serialize;

use crate::models::Service;

/// Share of the base price taken off for regular patients, in percent.
pub const REGULAR_PATIENT_DISCOUNT_PERCENT: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceQuote {
    pub base_price: f64,
    pub discount: f64,
    pub final_price: f64,
}

impl PriceQuote {
    pub fn has_discount(&self) -> bool {
        self.discount > 0.0
    }
}

/// Price for `service_id`. Unknown services are charged the default base price.
pub fn quote(service_id: &str, is_regular: bool) -> PriceQuote {
    let base_price = f64::from(Service::base_price(service_id));
    let discount = if is_regular {
        base_price * f64::from(REGULAR_PATIENT_DISCOUNT_PERCENT) / 100.0
    } else {
        0.0
    };

    PriceQuote {
        base_price,
        discount,
        final_price: base_price - discount,
    }
}
