pub mod booking;
pub mod chat_message;
pub mod clinic;
pub mod contact;
pub mod doctor;
pub mod service;
pub mod user_state;

pub use booking::{BookingForm, BookingRecord};
pub use chat_message::{ChatMessage, Sender};
pub use clinic::{ClinicInfo, Coordinates, CLINIC};
pub use contact::ContactMessage;
pub use doctor::{Doctor, DOCTORS};
pub use service::{Service, DEFAULT_BASE_PRICE, SERVICE_CATALOG};
pub use user_state::UserState;
