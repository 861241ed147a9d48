pub mod booking;
pub mod chat;
pub mod contact;
pub mod geolocation;
pub mod guard;
pub mod pricing;

use std::fmt;

/// Where a submitted record ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    Remote,
    LocalFallback,
    /// Neither the remote call nor the local write succeeded.
    Unsaved,
}

/// Rejected form input, worded for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    Missing(&'static str),
    Empty(&'static str),
    InvalidEmail,
    UnknownService(String),
    UnknownDoctor(String),
    DateUnavailable,
    TimeUnavailable,
    NotExpectingText,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Missing(field) => write!(f, "Please choose a {} first.", field),
            FormError::Empty(field) => write!(f, "The {} can't be empty.", field),
            FormError::InvalidEmail => write!(f, "That doesn't look like an email address."),
            FormError::UnknownService(id) => write!(f, "Unknown service: {}", id),
            FormError::UnknownDoctor(id) => write!(f, "Unknown doctor: {}", id),
            FormError::DateUnavailable => write!(f, "That date can't be booked. Please pick another day."),
            FormError::TimeUnavailable => write!(f, "That time isn't available. Please pick another slot."),
            FormError::NotExpectingText => write!(f, "Please use the buttons above."),
        }
    }
}

impl std::error::Error for FormError {}

pub(crate) fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}
