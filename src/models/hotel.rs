//! Hotel-category record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HotelRecord {
    pub id: Uuid,
    pub business_id: Uuid,
    pub register_number: String,
    pub speciality: Option<String>,
    pub star_rating: Option<i16>,
    pub room_count: Option<i32>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub amenities: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHotel {
    #[serde(default)]
    pub register_number: String,
    pub speciality: Option<String>,
    pub star_rating: Option<i16>,
    pub room_count: Option<i32>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateHotel {
    pub register_number: Option<String>,
    pub speciality: Option<String>,
    pub star_rating: Option<i16>,
    pub room_count: Option<i32>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub amenities: Option<Vec<String>>,
}
