//! CRM lead record created as a follow-up hook for new listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub contact: String,
    pub business_type: String,
    pub status: String,
    pub notes: Option<String>,
    pub sales_user: Option<Uuid>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLead {
    pub name: String,
    pub contact: String,
    pub business_type: String,
    pub status: String,
    pub notes: Option<String>,
    pub sales_user: Option<Uuid>,
    pub follow_up_date: Option<DateTime<Utc>>,
}
