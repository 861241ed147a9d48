use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    ReplyMarkup,
};

use crate::features::booking::{
    earliest_booking_date, format_12h_time, format_long_date, time_slots_for, BookingDraft,
};
use crate::features::chat::QUICK_REPLIES;
use crate::features::pricing::{PriceQuote, REGULAR_PATIENT_DISCOUNT_PERCENT};
use crate::models::{BookingRecord, Doctor, Service, CLINIC};

pub const MENU_BOOK: &str = "📅 Book Appointment";
pub const MENU_CONTACT: &str = "✉️ Contact Us";
pub const MENU_LOCATION: &str = "📍 Find Us";
pub const MENU_CLINIC: &str = "ℹ️ Clinic Info";
pub const USE_MY_LOCATION: &str = "📍 Use My Location";
pub const CANCEL_LOCATION: &str = "❌ Cancel";

/// Escaping for MarkdownV2
pub fn escape_markdown_v2(text: &str) -> String {
    let specials = ['_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\'];
    let mut out = String::with_capacity(text.len() * 2);

    for ch in text.chars() {
        if specials.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// `*label* value`, both parts escaped.
pub fn field_line(label: &str, value: &str) -> String {
    format!("*{}* {}", escape_markdown_v2(label), escape_markdown_v2(value))
}

/// Rupee amount with Indian digit grouping: 150000 -> "₹1,50,000".
pub fn format_rupees(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    let digits = whole.to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    if fraction == 0 {
        format!("{}₹{}", sign, grouped)
    } else {
        format!("{}₹{}.{:02}", sign, grouped, fraction)
    }
}

pub fn price_panel(quote: &PriceQuote) -> String {
    let mut lines = vec![field_line("Price:", &format_rupees(quote.base_price))];
    if quote.has_discount() {
        lines.push(field_line(
            &format!("Regular patient discount ({}%):", REGULAR_PATIENT_DISCOUNT_PERCENT),
            &format!("-{}", format_rupees(quote.discount)),
        ));
    }
    lines.push(field_line("Total:", &format_rupees(quote.final_price)));
    lines.join("\n")
}

/// Everything chosen so far plus the live price.
pub fn booking_summary(draft: &BookingDraft) -> String {
    let mut lines = vec!["📅 *Book an appointment*".to_string(), String::new()];

    if let Some(service) = draft.service.as_deref() {
        lines.push(field_line("Service:", Service::display_name(service).unwrap_or(service)));
    }
    if let Some(doctor) = draft.doctor.as_deref() {
        lines.push(field_line("Doctor:", doctor));
    }
    if let Some(date) = draft.date {
        lines.push(field_line("Date:", &format_long_date(&date.format("%Y-%m-%d").to_string())));
    }
    if let Some(time) = draft.time {
        lines.push(field_line("Time:", &format_12h_time(&time.format("%H:%M").to_string())));
    }
    if let Some(name) = draft.name.as_deref() {
        lines.push(field_line("Patient:", name));
    }
    if let Some(phone) = draft.phone.as_deref() {
        lines.push(field_line("Phone:", phone));
    }
    if let Some(email) = draft.email.as_deref() {
        lines.push(field_line("Email:", email));
    }

    lines.push(String::new());
    lines.push(price_panel(&draft.live_quote()));
    lines.join("\n")
}

/// Confirmation card. Every field coming from the user is escaped.
pub fn booking_confirmation(record: &BookingRecord) -> String {
    let service = Service::display_name(&record.service).unwrap_or(&record.service);

    let mut lines = vec![
        "✅ *Appointment booked\\!*".to_string(),
        String::new(),
        field_line("Booking ID:", &record.booking_id),
        field_line("Patient:", &record.name),
        field_line("Doctor:", &record.doctor),
        field_line("Service:", service),
        field_line("Date:", &format_long_date(&record.date)),
        field_line("Time:", &format_12h_time(&record.time)),
    ];
    if record.is_regular_patient {
        lines.push(field_line(
            "Discount Applied:",
            &format!("{}% OFF ({})", REGULAR_PATIENT_DISCOUNT_PERCENT, format_rupees(record.discount)),
        ));
    }
    lines.push(field_line("Total Amount:", &format_rupees(record.final_price)));
    lines.join("\n")
}

pub fn services_text() -> String {
    let mut lines = vec!["🩺 *Our services*".to_string(), String::new()];
    for service in Service::all() {
        lines.push(format!(
            "*{}* · {}\n{}",
            escape_markdown_v2(service.name),
            escape_markdown_v2(&format_rupees(f64::from(service.price))),
            escape_markdown_v2(service.description)
        ));
    }
    lines.push(String::new());
    lines.push(escape_markdown_v2(&format!(
        "Regular patients get {}% off every session.",
        REGULAR_PATIENT_DISCOUNT_PERCENT
    )));
    lines.join("\n")
}

pub fn doctors_text() -> String {
    let mut lines = vec!["👩‍⚕️ *Our physiotherapists*".to_string(), String::new()];
    for doctor in Doctor::all() {
        lines.push(format!(
            "*{}*\n{}",
            escape_markdown_v2(doctor.name),
            escape_markdown_v2(&format!("{}, {}", doctor.specialty, doctor.experience))
        ));
    }
    lines.join("\n")
}

pub fn clinic_text() -> String {
    let mut lines = vec![
        format!("🏥 *{}*", escape_markdown_v2(CLINIC.name)),
        String::new(),
        escape_markdown_v2(CLINIC.street),
        escape_markdown_v2(&format!("{} {}", CLINIC.city, CLINIC.postal_code)),
        String::new(),
        field_line("Phone:", &CLINIC.phones.join(", ")),
        field_line("Email:", CLINIC.email),
        String::new(),
        "*Opening hours*".to_string(),
    ];
    for (days, hours) in CLINIC.hours {
        lines.push(escape_markdown_v2(&format!("{}: {}", days, hours)));
    }
    lines.join("\n")
}

/// Main menu
pub fn main_menu_keyboard() -> ReplyMarkup {
    ReplyMarkup::Keyboard(
        KeyboardMarkup::new(vec![
            vec![KeyboardButton::new(MENU_BOOK), KeyboardButton::new(MENU_CONTACT)],
            vec![KeyboardButton::new(MENU_LOCATION), KeyboardButton::new(MENU_CLINIC)],
        ])
        .resize_keyboard()
    )
}

pub fn location_request_keyboard() -> ReplyMarkup {
    ReplyMarkup::Keyboard(
        KeyboardMarkup::new(vec![
            vec![KeyboardButton::new(USE_MY_LOCATION).request(ButtonRequest::Location)],
            vec![KeyboardButton::new(CANCEL_LOCATION)],
        ])
        .resize_keyboard()
        .one_time_keyboard()
    )
}

pub fn directions_keyboard() -> Option<InlineKeyboardMarkup> {
    match reqwest::Url::parse(&CLINIC.directions_url()) {
        Ok(url) => Some(InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::url("🧭 Get Directions", url),
        ]])),
        Err(e) => {
            log::error!("Invalid directions url: {}", e);
            None
        }
    }
}

pub fn services_keyboard() -> InlineKeyboardMarkup {
    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = Service::all()
        .iter()
        .map(|service| {
            vec![InlineKeyboardButton::callback(
                format!("{} · {}", service.name, format_rupees(f64::from(service.price))),
                format!("svc_{}", service.id),
            )]
        })
        .collect();

    keyboard.push(vec![InlineKeyboardButton::callback("❌ Cancel", "booking_cancel")]);
    InlineKeyboardMarkup::new(keyboard)
}

pub fn doctors_keyboard() -> InlineKeyboardMarkup {
    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = Doctor::all()
        .iter()
        .map(|doctor| {
            vec![InlineKeyboardButton::callback(
                format!("{} · {}", doctor.name, doctor.specialty),
                format!("doc_{}", doctor.id),
            )]
        })
        .collect();

    keyboard.push(vec![InlineKeyboardButton::callback("❌ Cancel", "booking_cancel")]);
    InlineKeyboardMarkup::new(keyboard)
}

/// One "Book with" button per doctor, opening the booking panel with that doctor chosen.
pub fn doctor_cards_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        Doctor::all()
            .iter()
            .map(|doctor| {
                vec![InlineKeyboardButton::callback(
                    format!("📅 Book with {}", doctor.name),
                    format!("bookdoc_{}", doctor.id),
                )]
            })
            .collect::<Vec<_>>(),
    )
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month.checked_add(1)?, 1)
    }?;
    next_month.pred_opt().map(|last| last.day())
}

/// Month grid. Days before tomorrow and closed days are not selectable.
pub fn make_calendar_keyboard(year: i32, month: u32, today: NaiveDate) -> InlineKeyboardMarkup {
    let month_names = [
        "January", "February", "March", "April", "May", "June",
        "July", "August", "September", "October", "November", "December"
    ];

    let prev = if month == 1 { year.checked_sub(1).map(|y| (y, 12)) } else { month.checked_sub(1).map(|m| (year, m)) };
    let next = if month == 12 { year.checked_add(1).map(|y| (y, 1)) } else { month.checked_add(1).map(|m| (year, m)) };

    // Out-of-range callback data falls back to the current month.
    let (Some(first_day), Some(last_day), Some((prev_year, prev_month)), Some((next_year, next_month))) =
        (NaiveDate::from_ymd_opt(year, month, 1), days_in_month(year, month), prev, next)
    else {
        return make_calendar_keyboard(today.year(), today.month(), today);
    };

    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = Vec::new();

    keyboard.push(vec![
        InlineKeyboardButton::callback("◀️", format!("calendar_month_{}_{}", prev_year, prev_month)),
        InlineKeyboardButton::callback(
            format!("{} {}", month_names[month as usize - 1], year),
            "calendar_ignore".to_string()
        ),
        InlineKeyboardButton::callback("▶️", format!("calendar_month_{}_{}", next_year, next_month)),
    ]);

    keyboard.push(
        ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]
            .iter()
            .map(|day| InlineKeyboardButton::callback(*day, "calendar_ignore".to_string()))
            .collect(),
    );

    let earliest = earliest_booking_date(today);
    let mut current_week = Vec::new();

    for _ in 0..first_day.weekday().num_days_from_monday() {
        current_week.push(InlineKeyboardButton::callback(" ", "calendar_ignore".to_string()));
    }

    for offset in 0..last_day {
        let date = first_day + Duration::days(i64::from(offset));
        let day = date.day();

        if date < earliest || time_slots_for(date).is_empty() {
            current_week.push(InlineKeyboardButton::callback("·", "calendar_ignore".to_string()));
        } else {
            let callback_data = format!("calendar_day_{}_{}_{}", year, month, day);
            current_week.push(InlineKeyboardButton::callback(day.to_string(), callback_data));
        }

        if current_week.len() == 7 {
            keyboard.push(current_week);
            current_week = Vec::new();
        }
    }

    if !current_week.is_empty() {
        while current_week.len() < 7 {
            current_week.push(InlineKeyboardButton::callback(" ", "calendar_ignore".to_string()));
        }
        keyboard.push(current_week);
    }

    keyboard.push(vec![InlineKeyboardButton::callback("❌ Cancel", "booking_cancel")]);

    InlineKeyboardMarkup::new(keyboard)
}

pub fn make_time_keyboard(date: NaiveDate) -> InlineKeyboardMarkup {
    let slots: Vec<NaiveTime> = time_slots_for(date);

    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = slots
        .chunks(4)
        .map(|row| {
            row.iter()
                .map(|time| {
                    InlineKeyboardButton::callback(
                        time.format("%H:%M").to_string(),
                        format!("time_{}", time.format("%H%M")),
                    )
                })
                .collect()
        })
        .collect();

    if keyboard.is_empty() {
        keyboard.push(vec![InlineKeyboardButton::callback("❌ Closed on this day", "calendar_ignore")]);
    }

    keyboard.push(vec![
        InlineKeyboardButton::callback("◀️ Back to calendar", format!("calendar_month_{}_{}", date.year(), date.month())),
        InlineKeyboardButton::callback("❌ Cancel", "booking_cancel"),
    ]);

    InlineKeyboardMarkup::new(keyboard)
}

pub fn review_keyboard(regular_patient: bool) -> InlineKeyboardMarkup {
    let toggle = if regular_patient {
        format!("☑️ Regular patient ({}% off)", REGULAR_PATIENT_DISCOUNT_PERCENT)
    } else {
        format!("⬜ Regular patient ({}% off)", REGULAR_PATIENT_DISCOUNT_PERCENT)
    };

    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(toggle, "booking_regular")],
        vec![InlineKeyboardButton::callback("✅ Confirm booking", "booking_submit")],
        vec![InlineKeyboardButton::callback("❌ Cancel", "booking_cancel")],
    ])
}

pub fn quick_replies_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        QUICK_REPLIES
            .iter()
            .enumerate()
            .map(|(index, label)| vec![InlineKeyboardButton::callback(*label, format!("quick_{}", index))])
            .collect::<Vec<_>>(),
    )
}

/// One button per suggested action. Labels are looked up by turn and index on click.
pub fn suggestions_keyboard(turn: u64, labels: &[String]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                vec![InlineKeyboardButton::callback(label.clone(), format!("suggest_{}_{}", turn, index))]
            })
            .collect::<Vec<_>>(),
    )
}
