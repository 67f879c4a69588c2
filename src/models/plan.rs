//! Pricing plan model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PricePlan {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub duration_days: i32,
    pub features: serde_json::Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Plan data as exposed on a business detail view, internal fields stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanView {
    pub name: String,
    pub price_cents: i64,
    pub duration_days: i32,
    pub features: serde_json::Value,
}

impl From<PricePlan> for PlanView {
    fn from(p: PricePlan) -> Self {
        Self {
            name: p.name,
            price_cents: p.price_cents,
            duration_days: p.duration_days,
            features: p.features,
        }
    }
}
