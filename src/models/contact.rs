use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};

/// A contact form submission. Form fields are free-form and flattened next to `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}
