//! Review model and the reviewer-enriched view returned by read APIs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A review joined with the reviewer's display name and avatar.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewView {
    pub reviewer_name: Option<String>,
    pub reviewer_avatar: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
    pub time: DateTime<Utc>,
}
