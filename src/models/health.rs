//! Health-category record model (clinics, hospitals, practices).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HealthRecord {
    pub id: Uuid,
    pub business_id: Uuid,
    pub register_number: String,
    pub speciality: Option<String>,
    pub consultation_fee_cents: Option<i64>,
    pub ambulance_available: Option<bool>,
    pub facilities: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHealth {
    #[serde(default)]
    pub register_number: String,
    pub speciality: Option<String>,
    pub consultation_fee_cents: Option<i64>,
    pub ambulance_available: Option<bool>,
    #[serde(default)]
    pub facilities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateHealth {
    pub register_number: Option<String>,
    pub speciality: Option<String>,
    pub consultation_fee_cents: Option<i64>,
    pub ambulance_available: Option<bool>,
    pub facilities: Option<Vec<String>>,
}
