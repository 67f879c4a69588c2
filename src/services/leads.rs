//! Best-effort CRM lead sink.
//!
//! Lead creation is auxiliary bookkeeping around a listing; callers log and
//! swallow failures rather than aborting the primary operation.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::lead::{CreateLead, Lead};

pub async fn create(pool: &PgPool, input: &CreateLead) -> Result<Lead, AppError> {
    let lead = sqlx::query_as::<_, Lead>(
        "INSERT INTO leads (name, contact, business_type, status, notes, sales_user, follow_up_date) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(&input.name)
    .bind(&input.contact)
    .bind(&input.business_type)
    .bind(&input.status)
    .bind(&input.notes)
    .bind(input.sales_user)
    .bind(input.follow_up_date)
    .fetch_one(pool)
    .await?;
    Ok(lead)
}
