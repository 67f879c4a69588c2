//! Owner dashboard analytics: deduplicated views and review counts.

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;

/// Per-business view and review counts.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BusinessViewStats {
    pub id: Uuid,
    pub name: String,
    pub views: i64,
    pub reviews: i64,
}

/// Aggregated analytics across all businesses an owner has listed.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerAnalytics {
    pub total_views: i64,
    pub total_reviews: i64,
    pub views_per_business: Vec<BusinessViewStats>,
}

pub async fn owner_analytics(pool: &PgPool, owner_id: Uuid) -> Result<OwnerAnalytics, AppError> {
    let stats = sqlx::query_as::<_, BusinessViewStats>(
        "SELECT b.id, b.name, b.views, COUNT(r.id) AS reviews \
         FROM businesses b \
         LEFT JOIN reviews r ON r.business_id = b.id \
         WHERE b.owner_id = $1 \
         GROUP BY b.id \
         ORDER BY b.created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    if stats.is_empty() {
        return Err(AppError::NotFound(
            "No businesses found for this user".to_string(),
        ));
    }

    let total_views = stats.iter().map(|s| s.views).sum();
    let total_reviews = stats.iter().map(|s| s.reviews).sum();

    Ok(OwnerAnalytics {
        total_views,
        total_reviews,
        views_per_business: stats,
    })
}
