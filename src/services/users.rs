//! User directory lookups consumed by sales assignment and notifications.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{User, UserRole};

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Look up the single user owning a referral code.
pub async fn find_by_referral_code(pool: &PgPool, code: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE referral_code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// All active users holding a role.
pub async fn find_by_role(pool: &PgPool, role: UserRole) -> Result<Vec<User>, AppError> {
    let users =
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = $1 AND is_active")
            .bind(role)
            .fetch_all(pool)
            .await?;
    Ok(users)
}
