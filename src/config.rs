use std::env;

use anyhow::{Context, Result};

const CLINIC_API_URL_ENV: &str = "CLINIC_API_URL";
const CLINIC_API_RETRIES_ENV: &str = "CLINIC_API_RETRIES";
const DATABASE_URL_ENV: &str = "DATABASE_URL";

const DEFAULT_CLINIC_API_URL: &str = "http://localhost:8000";
const DEFAULT_RETRIES: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_retries: u32,
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_retries = match get(CLINIC_API_RETRIES_ENV) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a non-negative integer, got {:?}", CLINIC_API_RETRIES_ENV, raw))?,
            None => DEFAULT_RETRIES,
        };

        Ok(Self {
            api_base_url: get(CLINIC_API_URL_ENV).unwrap_or_else(|| DEFAULT_CLINIC_API_URL.to_string()),
            api_retries,
            database_url: get(DATABASE_URL_ENV),
        })
    }
}
