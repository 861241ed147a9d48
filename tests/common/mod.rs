#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use physiohealth_bot::api::{ApiError, ChatRequest, ChatResponse, ClinicApi};
use physiohealth_bot::models::{BookingForm, BookingRecord, ContactMessage};
use physiohealth_bot::storage::{LocalStore, StorageKey, StoreError};
use teloxide::types::ChatId;
use tokio::sync::Mutex;

pub const OWNER: ChatId = ChatId(42);

/// Accepts everything and remembers what it was sent.
#[derive(Default)]
pub struct RecordingApi {
    pub chat_response: Option<ChatResponse>,
    pub appointments: Mutex<Vec<BookingRecord>>,
    pub contacts: Mutex<Vec<ContactMessage>>,
    pub chats: Mutex<Vec<ChatRequest>>,
}

impl RecordingApi {
    pub fn replying(response: &str, actions: &[&str]) -> Self {
        Self {
            chat_response: Some(ChatResponse {
                response: response.to_string(),
                suggested_actions: actions.iter().map(|a| a.to_string()).collect(),
            }),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ClinicApi for RecordingApi {
    async fn create_appointment(&self, booking: &BookingRecord) -> Result<(), ApiError> {
        self.appointments.lock().await.push(booking.clone());
        Ok(())
    }

    async fn send_contact(&self, message: &ContactMessage) -> Result<(), ApiError> {
        self.contacts.lock().await.push(message.clone());
        Ok(())
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.chats.lock().await.push(request.clone());
        self.chat_response
            .clone()
            .ok_or_else(|| ApiError::Decode("no canned response".to_string()))
    }
}

/// Fails every call the same way.
pub struct FailingApi {
    pub status: Option<u16>,
}

impl FailingApi {
    pub fn status(code: u16) -> Self {
        Self { status: Some(code) }
    }

    pub fn offline() -> Self {
        Self { status: None }
    }

    fn error(&self) -> ApiError {
        match self.status {
            Some(code) => ApiError::Status(code),
            None => ApiError::Network("connection refused".to_string()),
        }
    }
}

#[async_trait]
impl ClinicApi for FailingApi {
    async fn create_appointment(&self, _booking: &BookingRecord) -> Result<(), ApiError> {
        Err(self.error())
    }

    async fn send_contact(&self, _message: &ContactMessage) -> Result<(), ApiError> {
        Err(self.error())
    }

    async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        Err(self.error())
    }
}

/// A store whose writes always fail.
pub struct BrokenStore;

#[async_trait]
impl LocalStore for BrokenStore {
    async fn load(&self, _owner: ChatId, _key: StorageKey) -> Result<Vec<serde_json::Value>, StoreError> {
        Err(StoreError::DatabaseError("disk full".to_string()))
    }

    async fn append(&self, _owner: ChatId, _key: StorageKey, _entry: serde_json::Value) -> Result<(), StoreError> {
        Err(StoreError::DatabaseError("disk full".to_string()))
    }
}

pub fn api<T: ClinicApi + 'static>(api: T) -> Arc<dyn ClinicApi> {
    Arc::new(api)
}

pub fn create_booking_form(service: &str, regular_patient: bool) -> BookingForm {
    BookingForm {
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "+91 90000 11111".to_string(),
        doctor: "Dr. Priya Sharma".to_string(),
        service: service.to_string(),
        date: "2026-10-20".to_string(),
        time: "14:30".to_string(),
        regular_patient,
    }
}

pub fn create_contact_fields() -> BTreeMap<String, String> {
    [
        ("name", "Ravi"),
        ("email", "ravi@example.com"),
        ("subject", "Parking"),
        ("message", "Is there parking near the clinic?"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
