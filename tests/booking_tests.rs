mod common;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use physiohealth_bot::features::booking::{
    build_record, earliest_booking_date, format_12h_time, format_long_date, generate_booking_id,
    is_bookable_date, time_slots_for, BookingDraft, BookingStep, BookingSubmitter,
};
use physiohealth_bot::features::{FormError, Persistence};
use physiohealth_bot::models::BookingRecord;
use physiohealth_bot::storage::{load_records, MemoryStore, StorageKey};

use common::{api, create_booking_form, BrokenStore, FailingApi, RecordingApi, OWNER};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// Sunday
fn today() -> NaiveDate {
    date(2026, 10, 18)
}

fn filled_draft() -> BookingDraft {
    let mut draft = BookingDraft::new();
    draft.select_service("sports").unwrap();
    draft.select_doctor("dr-priya").unwrap();
    draft.select_date(date(2026, 10, 20), today()).unwrap();
    draft.select_time(time(14, 30)).unwrap();
    draft.accept_text("Asha Rao").unwrap();
    draft.accept_text("+91 90000 11111").unwrap();
    draft.accept_text("asha@example.com").unwrap();
    draft
}

#[cfg(test)]
mod booking_id_tests {
    use super::*;

    #[test]
    fn test_id_shape() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        let id = generate_booking_id(now);

        assert!(id.starts_with("PH"));
        assert!(id[2..].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));

        // 1792314000000 ms is "MVDLH9C0" in base 36, plus the 4 random characters
        assert_eq!(&id[2..10], "MVDLH9C0");
        assert_eq!(id.len(), 2 + 8 + 4);
    }

    #[test]
    fn test_ids_are_unique() {
        let now = Utc::now();
        let ids: HashSet<String> = (0..1000).map(|_| generate_booking_id(now)).collect();
        assert!(ids.len() > 990);
    }
}

#[cfg(test)]
mod record_tests {
    use super::*;

    #[test]
    fn test_record_recomputes_price() {
        let now = Utc::now();
        let record = build_record(&create_booking_form("sports", true), "PHTEST".to_string(), now);

        assert_eq!(record.booking_id, "PHTEST");
        assert_eq!(record.original_price, 2000.0);
        assert_eq!(record.discount, 600.0);
        assert_eq!(record.final_price, 1400.0);
        assert!(record.is_regular_patient);
        assert_eq!(record.created_at, now);
    }

    #[test]
    fn test_record_wire_format() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        let record = build_record(&create_booking_form("pain", false), "PH1".to_string(), now);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["bookingId"], "PH1");
        assert_eq!(json["isRegularPatient"], false);
        assert_eq!(json["originalPrice"], 1000.0);
        assert_eq!(json["finalPrice"], 1000.0);
        assert_eq!(json["service"], "pain");
        assert!(json["createdAt"].as_str().unwrap().starts_with("2026-10-18T09:00:00"));
    }
}

#[cfg(test)]
mod schedule_tests {
    use super::*;

    #[test]
    fn test_earliest_date_is_tomorrow() {
        assert_eq!(earliest_booking_date(today()), date(2026, 10, 19));
        assert!(!is_bookable_date(today(), today()));
        assert!(!is_bookable_date(date(2026, 10, 1), today()));
        assert!(is_bookable_date(date(2026, 10, 19), today()));
    }

    #[test]
    fn test_weekday_slots() {
        let slots = time_slots_for(date(2026, 10, 20));
        assert_eq!(slots.first(), Some(&time(9, 0)));
        assert_eq!(slots.last(), Some(&time(19, 30)));
        assert_eq!(slots.len(), 22);
    }

    #[test]
    fn test_saturday_closes_early() {
        let slots = time_slots_for(date(2026, 10, 24));
        assert_eq!(slots.last(), Some(&time(13, 30)));
        assert_eq!(slots.len(), 10);
    }

    #[test]
    fn test_sunday_closed() {
        assert!(time_slots_for(date(2026, 10, 25)).is_empty());
        assert!(!is_bookable_date(date(2026, 10, 25), today()));
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(format_long_date("2026-10-20"), "Tuesday, 20 October 2026");
        assert_eq!(format_12h_time("14:30"), "2:30 PM");
        assert_eq!(format_12h_time("09:00"), "9:00 AM");
        assert_eq!(format_12h_time("12:00"), "12:00 PM");
        assert_eq!(format_long_date("soon"), "soon");
        assert_eq!(format_12h_time("noonish"), "noonish");
    }
}

#[cfg(test)]
mod draft_tests {
    use super::*;

    #[test]
    fn test_steps_in_order() {
        let mut draft = BookingDraft::new();
        assert_eq!(draft.step, BookingStep::Service);

        draft.select_service("neurological").unwrap();
        assert_eq!(draft.step, BookingStep::Doctor);

        draft.select_doctor("dr-amit").unwrap();
        assert_eq!(draft.doctor.as_deref(), Some("Dr. Amit Patel"));
        assert_eq!(draft.step, BookingStep::Date);

        draft.select_date(date(2026, 10, 21), today()).unwrap();
        assert_eq!(draft.step, BookingStep::Time);

        draft.select_time(time(10, 0)).unwrap();
        assert_eq!(draft.step, BookingStep::Name);

        assert_eq!(draft.accept_text("  Meera  "), Ok(BookingStep::Phone));
        assert_eq!(draft.name.as_deref(), Some("Meera"));
        assert_eq!(draft.accept_text("12345"), Ok(BookingStep::Email));
        assert_eq!(draft.accept_text("meera@example.com"), Ok(BookingStep::Review));
    }

    #[test]
    fn test_preselected_doctor_skips_doctor_step() {
        let mut draft = BookingDraft::with_doctor("dr-rajesh").unwrap();
        assert_eq!(draft.step, BookingStep::Service);
        assert_eq!(draft.doctor.as_deref(), Some("Dr. Rajesh Kumar"));

        draft.select_service("orthopedic").unwrap();
        assert_eq!(draft.step, BookingStep::Date);

        assert_eq!(
            BookingDraft::with_doctor("dr-nobody"),
            Err(FormError::UnknownDoctor("dr-nobody".to_string()))
        );
    }

    #[test]
    fn test_live_quote_follows_service_and_toggle() {
        let mut draft = BookingDraft::new();
        assert_eq!(draft.live_quote().base_price, 1500.0);

        draft.select_service("sports").unwrap();
        assert_eq!(draft.live_quote().final_price, 2000.0);

        assert!(draft.toggle_regular_patient());
        assert_eq!(draft.live_quote().final_price, 1400.0);

        assert!(!draft.toggle_regular_patient());
        assert_eq!(draft.live_quote().final_price, 2000.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut draft = BookingDraft::new();
        assert_eq!(
            draft.select_service("yoga"),
            Err(FormError::UnknownService("yoga".to_string()))
        );
        assert_eq!(draft.accept_text("hello"), Err(FormError::NotExpectingText));
        assert_eq!(draft.select_time(time(10, 0)), Err(FormError::Missing("date")));
        assert_eq!(
            draft.select_date(today(), today()),
            Err(FormError::DateUnavailable)
        );

        draft.select_date(date(2026, 10, 24), today()).unwrap();
        assert_eq!(draft.select_time(time(15, 0)), Err(FormError::TimeUnavailable));
        assert_eq!(draft.select_time(time(10, 15)), Err(FormError::TimeUnavailable));
    }

    #[test]
    fn test_email_validation() {
        let mut draft = filled_draft();
        draft.email = None;
        draft.step = BookingStep::Email;

        assert_eq!(draft.accept_text("not-an-email"), Err(FormError::InvalidEmail));
        assert_eq!(draft.accept_text("a@b"), Err(FormError::InvalidEmail));
        assert_eq!(draft.accept_text("a@b.in"), Ok(BookingStep::Review));
    }

    #[test]
    fn test_changing_date_clears_time() {
        let mut draft = filled_draft();
        draft.select_date(date(2026, 10, 22), today()).unwrap();
        assert_eq!(draft.time, None);
        assert_eq!(draft.step, BookingStep::Time);
    }

    #[test]
    fn test_to_form() {
        let mut draft = filled_draft();
        draft.toggle_regular_patient();
        let form = draft.to_form().unwrap();

        assert_eq!(form, create_booking_form("sports", true));
    }

    #[test]
    fn test_to_form_incomplete() {
        let mut draft = BookingDraft::new();
        draft.select_service("home").unwrap();
        assert!(matches!(draft.to_form(), Err(FormError::Missing(_))));
    }
}

#[cfg(test)]
mod submitter_tests {
    use super::*;

    #[tokio::test]
    async fn test_remote_success() {
        let remote = Arc::new(RecordingApi::default());
        let store = Arc::new(MemoryStore::new());
        let submitter = BookingSubmitter::new(remote.clone(), store.clone());

        let outcome = submitter.submit(OWNER, &create_booking_form("sports", true)).await;

        assert_eq!(outcome.persistence, Persistence::Remote);
        assert_eq!(outcome.record.final_price, 1400.0);
        assert_eq!(remote.appointments.lock().await.as_slice(), &[outcome.record.clone()]);

        let local: Vec<BookingRecord> = load_records(store.as_ref(), OWNER, StorageKey::Bookings).await.unwrap();
        assert!(local.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_falls_back_to_local_store() {
        let store = Arc::new(MemoryStore::new());
        let submitter = BookingSubmitter::new(api(FailingApi::status(500)), store.clone());

        let outcome = submitter.submit(OWNER, &create_booking_form("sports", true)).await;

        assert_eq!(outcome.persistence, Persistence::LocalFallback);
        assert!(outcome.record.booking_id.starts_with("PH"));

        let local: Vec<BookingRecord> = load_records(store.as_ref(), OWNER, StorageKey::Bookings).await.unwrap();
        assert_eq!(local, vec![outcome.record]);
    }

    #[tokio::test]
    async fn test_fallback_appends() {
        let store = Arc::new(MemoryStore::new());
        let submitter = BookingSubmitter::new(api(FailingApi::offline()), store.clone());

        submitter.submit(OWNER, &create_booking_form("pain", false)).await;
        submitter.submit(OWNER, &create_booking_form("home", false)).await;

        let local: Vec<BookingRecord> = load_records(store.as_ref(), OWNER, StorageKey::Bookings).await.unwrap();
        assert_eq!(local.len(), 2);
        assert_eq!(local[0].service, "pain");
        assert_eq!(local[1].service, "home");
    }

    #[tokio::test]
    async fn test_both_failing_still_confirms() {
        let submitter = BookingSubmitter::new(api(FailingApi::offline()), Arc::new(BrokenStore));

        let outcome = submitter.submit(OWNER, &create_booking_form("sports", false)).await;

        assert_eq!(outcome.persistence, Persistence::Unsaved);
        assert_eq!(outcome.record.final_price, 2000.0);
    }
}
