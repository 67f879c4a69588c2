//! Review store: reviewer-enriched reads for business detail views.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::review::ReviewView;

/// All reviews for a business, newest first, each joined with the
/// reviewer's display name and avatar.
pub async fn find_by_business(
    pool: &PgPool,
    business_id: Uuid,
) -> Result<Vec<ReviewView>, AppError> {
    let reviews = sqlx::query_as::<_, ReviewView>(
        "SELECT u.full_name AS reviewer_name, u.avatar AS reviewer_avatar, \
         r.rating, r.comment, r.created_at AS time \
         FROM reviews r \
         LEFT JOIN users u ON u.id = r.user_id \
         WHERE r.business_id = $1 \
         ORDER BY r.created_at DESC",
    )
    .bind(business_id)
    .fetch_all(pool)
    .await?;
    Ok(reviews)
}
