//! Beauty & spa category record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BeautySpaRecord {
    pub id: Uuid,
    pub business_id: Uuid,
    pub register_number: String,
    pub speciality: Option<String>,
    pub appointment_required: Option<bool>,
    pub stylist_count: Option<i32>,
    pub treatments: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBeautySpa {
    #[serde(default)]
    pub register_number: String,
    pub speciality: Option<String>,
    pub appointment_required: Option<bool>,
    pub stylist_count: Option<i32>,
    #[serde(default)]
    pub treatments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateBeautySpa {
    pub register_number: Option<String>,
    pub speciality: Option<String>,
    pub appointment_required: Option<bool>,
    pub stylist_count: Option<i32>,
    pub treatments: Option<Vec<String>>,
}
