use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use rand::Rng;
use teloxide::types::ChatId;

use crate::api::ClinicApi;
use crate::features::pricing::{self, PriceQuote};
use crate::features::{looks_like_email, FormError, Persistence};
use crate::models::{BookingForm, BookingRecord, Doctor, Service};
use crate::storage::{append_record, LocalStore, StorageKey};

const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const BOOKING_ID_PREFIX: &str = "PH";
const BOOKING_ID_SUFFIX_LEN: usize = 4;
pub const SLOT_MINUTES: u32 = 30;

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// `PH` + base-36 millisecond timestamp + 4 random base-36 characters.
/// Unique with high probability only; there is no collision check.
pub fn generate_booking_id(now: DateTime<Utc>) -> String {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..BOOKING_ID_SUFFIX_LEN)
        .map(|_| BASE36_DIGITS[rng.gen_range(0..BASE36_DIGITS.len())] as char)
        .collect();

    format!("{}{}{}", BOOKING_ID_PREFIX, to_base36(millis), suffix)
}

/// Finalizes a form into a record. Prices are always recomputed from the form itself.
pub fn build_record(form: &BookingForm, booking_id: String, now: DateTime<Utc>) -> BookingRecord {
    let PriceQuote { base_price, discount, final_price } = pricing::quote(&form.service, form.regular_patient);

    BookingRecord {
        booking_id,
        name: form.name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
        doctor: form.doctor.clone(),
        service: form.service.clone(),
        date: form.date.clone(),
        time: form.time.clone(),
        is_regular_patient: form.regular_patient,
        original_price: base_price,
        discount,
        final_price,
        created_at: now,
    }
}

pub fn earliest_booking_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(1)
}

/// Appointment start times offered on `date`, following the clinic's opening hours.
pub fn time_slots_for(date: NaiveDate) -> Vec<NaiveTime> {
    let (open, close) = match date.weekday() {
        Weekday::Sun => return Vec::new(),
        Weekday::Sat => (9, 14),
        _ => (9, 20),
    };

    (open * 60..close * 60)
        .step_by(SLOT_MINUTES as usize)
        .filter_map(|minutes| NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0))
        .collect()
}

pub fn is_bookable_date(date: NaiveDate, today: NaiveDate) -> bool {
    date >= earliest_booking_date(today) && !time_slots_for(date).is_empty()
}

/// "2026-10-20" -> "Tuesday, 20 October 2026". Unparseable input is returned unchanged.
pub fn format_long_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%A, %-d %B %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// "14:30" -> "2:30 PM". Unparseable input is returned unchanged.
pub fn format_12h_time(time: &str) -> String {
    match NaiveTime::parse_from_str(time, "%H:%M") {
        Ok(parsed) => {
            let (is_pm, hour) = parsed.hour12();
            format!("{}:{:02} {}", hour, parsed.minute(), if is_pm { "PM" } else { "AM" })
        }
        Err(_) => time.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookingStep {
    #[default]
    Service,
    Doctor,
    Date,
    Time,
    Name,
    Phone,
    Email,
    Review,
}

/// Booking form state for one chat, filled in step by step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingDraft {
    pub step: BookingStep,
    pub service: Option<String>,
    pub doctor: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub regular_patient: bool,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh draft with the doctor already chosen. The service is still asked first.
    pub fn with_doctor(doctor_id: &str) -> Result<Self, FormError> {
        let mut draft = Self::new();
        draft.select_doctor(doctor_id)?;
        Ok(draft)
    }

    /// Price shown while the form is being filled. Not used for submission.
    pub fn live_quote(&self) -> PriceQuote {
        pricing::quote(self.service.as_deref().unwrap_or_default(), self.regular_patient)
    }

    pub fn select_service(&mut self, service_id: &str) -> Result<(), FormError> {
        let service = Service::find(service_id)
            .ok_or_else(|| FormError::UnknownService(service_id.to_string()))?;
        self.service = Some(service.id.to_string());
        if self.step == BookingStep::Service {
            self.step = if self.doctor.is_some() {
                BookingStep::Date
            } else {
                BookingStep::Doctor
            };
        }
        Ok(())
    }

    pub fn select_doctor(&mut self, doctor_id: &str) -> Result<(), FormError> {
        let doctor = Doctor::find(doctor_id)
            .ok_or_else(|| FormError::UnknownDoctor(doctor_id.to_string()))?;
        self.doctor = Some(doctor.name.to_string());
        if self.step == BookingStep::Doctor {
            self.step = BookingStep::Date;
        }
        Ok(())
    }

    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), FormError> {
        if !is_bookable_date(date, today) {
            return Err(FormError::DateUnavailable);
        }
        self.date = Some(date);
        self.time = None;
        self.step = BookingStep::Time;
        Ok(())
    }

    pub fn select_time(&mut self, time: NaiveTime) -> Result<(), FormError> {
        let date = self.date.ok_or(FormError::Missing("date"))?;
        if !time_slots_for(date).contains(&time) {
            return Err(FormError::TimeUnavailable);
        }
        self.time = Some(time);
        self.step = self.next_text_step();
        Ok(())
    }

    pub fn toggle_regular_patient(&mut self) -> bool {
        self.regular_patient = !self.regular_patient;
        self.regular_patient
    }

    /// Feeds typed text into the current step and returns the step that follows.
    pub fn accept_text(&mut self, text: &str) -> Result<BookingStep, FormError> {
        let value = text.trim();
        match self.step {
            BookingStep::Name => {
                if value.is_empty() {
                    return Err(FormError::Empty("name"));
                }
                self.name = Some(value.to_string());
            }
            BookingStep::Phone => {
                if value.is_empty() {
                    return Err(FormError::Empty("phone number"));
                }
                self.phone = Some(value.to_string());
            }
            BookingStep::Email => {
                if !looks_like_email(value) {
                    return Err(FormError::InvalidEmail);
                }
                self.email = Some(value.to_string());
            }
            _ => return Err(FormError::NotExpectingText),
        }
        self.step = self.next_text_step();
        Ok(self.step)
    }

    fn next_text_step(&self) -> BookingStep {
        if self.name.is_none() {
            BookingStep::Name
        } else if self.phone.is_none() {
            BookingStep::Phone
        } else if self.email.is_none() {
            BookingStep::Email
        } else {
            BookingStep::Review
        }
    }

    pub fn to_form(&self) -> Result<BookingForm, FormError> {
        Ok(BookingForm {
            name: self.name.clone().ok_or(FormError::Missing("name"))?,
            email: self.email.clone().ok_or(FormError::Missing("email"))?,
            phone: self.phone.clone().ok_or(FormError::Missing("phone number"))?,
            doctor: self.doctor.clone().ok_or(FormError::Missing("doctor"))?,
            service: self.service.clone().ok_or(FormError::Missing("service"))?,
            date: self
                .date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .ok_or(FormError::Missing("date"))?,
            time: self
                .time
                .map(|time| time.format("%H:%M").to_string())
                .ok_or(FormError::Missing("time"))?,
            regular_patient: self.regular_patient,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingOutcome {
    pub record: BookingRecord,
    pub persistence: Persistence,
}

#[derive(Clone)]
pub struct BookingSubmitter {
    api: Arc<dyn ClinicApi>,
    store: Arc<dyn LocalStore>,
}

impl BookingSubmitter {
    pub fn new(api: Arc<dyn ClinicApi>, store: Arc<dyn LocalStore>) -> Self {
        Self { api, store }
    }

    /// Never fails: a rejected or unreachable backend degrades to the local `physioBookings` list.
    pub async fn submit(&self, owner: ChatId, form: &BookingForm) -> BookingOutcome {
        let now = Utc::now();
        let record = build_record(form, generate_booking_id(now), now);

        let persistence = match self.api.create_appointment(&record).await {
            Ok(()) => {
                log::info!("✅ Booking {} stored remotely for {}", record.booking_id, owner);
                Persistence::Remote
            }
            Err(e) => {
                log::warn!("⚠️ Booking {} not stored remotely: {}", record.booking_id, e);
                match append_record(self.store.as_ref(), owner, StorageKey::Bookings, &record).await {
                    Ok(()) => {
                        log::info!("💾 Booking {} kept in {}", record.booking_id, StorageKey::Bookings);
                        Persistence::LocalFallback
                    }
                    Err(store_err) => {
                        log::error!("❌ Booking {} could not be saved locally: {}", record.booking_id, store_err);
                        Persistence::Unsaved
                    }
                }
            }
        };

        BookingOutcome { record, persistence }
    }
}
