//! Best-effort notification sink.
//!
//! Notifications are dispatched after the primary records are durable and
//! never fail the calling operation: errors are routed to the log and
//! swallowed.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::notification::{Notification, NotificationPayload};
use crate::models::user::UserRole;
use crate::services::users;

/// Deliver a notification to a single user.
pub async fn notify_user(
    pool: &PgPool,
    user_id: Uuid,
    payload: &NotificationPayload,
) -> Result<Notification, AppError> {
    let notification = sqlx::query_as::<_, Notification>(
        "INSERT INTO notifications (recipient, kind, title, message, data) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(user_id)
    .bind(&payload.kind)
    .bind(&payload.title)
    .bind(&payload.message)
    .bind(&payload.data)
    .fetch_one(pool)
    .await?;
    Ok(notification)
}

/// Deliver a notification to every active user holding a role.
pub async fn notify_role(
    pool: &PgPool,
    role: UserRole,
    payload: &NotificationPayload,
) -> Result<(), AppError> {
    let recipients = users::find_by_role(pool, role).await?;
    for user in recipients {
        notify_user(pool, user.id, payload).await?;
    }
    Ok(())
}

/// Fire-and-forget variant: spawn the delivery and log any failure.
pub fn notify_user_detached(pool: PgPool, user_id: Uuid, payload: NotificationPayload) {
    tokio::spawn(async move {
        if let Err(e) = notify_user(&pool, user_id, &payload).await {
            tracing::warn!(error = %e, %user_id, kind = %payload.kind, "User notification failed");
        }
    });
}

/// Fire-and-forget fan-out to the admin and superadmin roles, issued
/// concurrently and jointly awaited inside the detached task.
pub fn notify_admin_roles_detached(pool: PgPool, payload: NotificationPayload) {
    tokio::spawn(async move {
        let (admins, superadmins) = tokio::join!(
            notify_role(&pool, UserRole::Admin, &payload),
            notify_role(&pool, UserRole::Superadmin, &payload),
        );
        if let Err(e) = admins {
            tracing::warn!(error = %e, role = "admin", kind = %payload.kind, "Role notification failed");
        }
        if let Err(e) = superadmins {
            tracing::warn!(error = %e, role = "superadmin", kind = %payload.kind, "Role notification failed");
        }
    });
}
