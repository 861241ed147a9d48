pub mod types;

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Serialize;

use crate::models::{BookingRecord, ContactMessage};

pub use types::{ChatRequest, ChatResponse};

const APPOINTMENTS_PATH: &str = "/api/appointments";
const CONTACT_PATH: &str = "/api/contact";
const CHAT_PATH: &str = "/api/chat";

#[derive(Debug)]
pub enum ApiError {
    Network(String),
    Status(u16),
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e) => write!(f, "Network error: {}", e),
            ApiError::Status(code) => write!(f, "Unexpected status: {}", code),
            ApiError::Decode(e) => write!(f, "Decode error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl From<reqwest_middleware::Error> for ApiError {
    fn from(err: reqwest_middleware::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Remote clinic backend. Every non-2xx answer is an error.
#[async_trait]
pub trait ClinicApi: Send + Sync {
    async fn create_appointment(&self, booking: &BookingRecord) -> Result<(), ApiError>;

    async fn send_contact(&self, message: &ContactMessage) -> Result<(), ApiError>;

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;
}

pub struct HttpClinicApi {
    base_url: String,
    client: ClientWithMiddleware,
    chat_client: ClientWithMiddleware,
}

impl HttpClinicApi {
    /// `retries` applies to booking and contact calls only; chat is sent once.
    pub fn new(base_url: impl Into<String>, retries: u32) -> Self {
        let retry_policy = ExponentialBackoff::builder()
            .build_with_max_retries(retries);

        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let chat_client = ClientBuilder::new(Client::new()).build();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            chat_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<T: Serialize + ?Sized>(
        client: &ClientWithMiddleware,
        url: String,
        body: &T,
    ) -> Result<reqwest::Response, ApiError> {
        let response = client
            .post(url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .body(serde_json::to_vec(body)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        Ok(response)
    }
}

#[async_trait]
impl ClinicApi for HttpClinicApi {
    async fn create_appointment(&self, booking: &BookingRecord) -> Result<(), ApiError> {
        Self::post_json(&self.client, self.url(APPOINTMENTS_PATH), booking).await?;
        Ok(())
    }

    async fn send_contact(&self, message: &ContactMessage) -> Result<(), ApiError> {
        Self::post_json(&self.client, self.url(CONTACT_PATH), message).await?;
        Ok(())
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let response = Self::post_json(&self.chat_client, self.url(CHAT_PATH), request).await?;

        let text = response.text().await?;
        let response = serde_json::from_str::<ChatResponse>(&text)?;

        Ok(response)
    }
}
