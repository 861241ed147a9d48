use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};

/// Raw values of a submitted booking form, before any pricing is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub doctor: String,
    pub service: String,
    pub date: String,
    pub time: String,
    pub regular_patient: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub booking_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub doctor: String,
    pub service: String,
    pub date: String,
    pub time: String,
    pub is_regular_patient: bool,
    pub original_price: f64,
    pub discount: f64,
    pub final_price: f64,
    pub created_at: DateTime<Utc>,
}
