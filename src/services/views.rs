//! View dedup tracker: per-visitor counting over a rolling 24-hour window.
//!
//! A view counts only when no log entry for the business matches the same
//! visitor identity inside the window. Matching is OR across IP and
//! authenticated user id so neither anonymous nor logged-in repeat visits
//! inflate the counter. The check and the write are separate statements;
//! concurrent requests from one visitor may both pass the check and cause
//! a small overcount, which is accepted.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

/// Dedup window in hours. Repeat views inside this window do not count.
pub const VIEW_DEDUP_WINDOW_HOURS: i64 = 24;

/// Record a page view for a business, returning whether it counted.
///
/// On a counted view the `views` counter is incremented and a log row is
/// appended; a duplicate view mutates nothing.
pub async fn record_view(
    pool: &PgPool,
    business_id: Uuid,
    visitor_ip: &str,
    visitor_user_id: Option<Uuid>,
) -> Result<bool, AppError> {
    let cutoff = Utc::now() - Duration::hours(VIEW_DEDUP_WINDOW_HOURS);

    let seen = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(\
         SELECT 1 FROM business_views \
         WHERE business_id = $1 AND viewed_at > $2 \
         AND (visitor_ip = $3 OR ($4::uuid IS NOT NULL AND visitor_user_id = $4)))",
    )
    .bind(business_id)
    .bind(cutoff)
    .bind(visitor_ip)
    .bind(visitor_user_id)
    .fetch_one(pool)
    .await?;

    if seen {
        return Ok(false);
    }

    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE businesses SET views = views + 1 WHERE id = $1")
        .bind(business_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO business_views (business_id, visitor_ip, visitor_user_id) \
         VALUES ($1, $2, $3)",
    )
    .bind(business_id)
    .bind(visitor_ip)
    .bind(visitor_user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}
