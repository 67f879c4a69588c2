//! Pricing plan store: identifier validation and lookups.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::plan::{PlanView, PricePlan};

/// Parse a raw plan id into a UUID.
///
/// Form clients occasionally submit the id wrapped in quotes; strip one
/// layer of quoting and surrounding whitespace before the format check.
pub fn parse_plan_id(raw: &str) -> Result<Uuid, AppError> {
    let cleaned = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    cleaned
        .parse::<Uuid>()
        .map_err(|_| AppError::InvalidPlanId(raw.to_string()))
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PricePlan>, AppError> {
    let plan = sqlx::query_as::<_, PricePlan>("SELECT * FROM price_plans WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(plan)
}

/// Plan data for a business detail view, internal fields stripped.
pub async fn fetch_public(pool: &PgPool, id: Uuid) -> Result<Option<PlanView>, AppError> {
    Ok(find_by_id(pool, id).await?.map(PlanView::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_plan_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn parse_strips_quotes_and_whitespace() {
        let id = Uuid::new_v4();
        assert_eq!(parse_plan_id(&format!(" \"{id}\" ")).unwrap(), id);
        assert_eq!(parse_plan_id(&format!("'{id}'")).unwrap(), id);
    }

    #[test]
    fn parse_rejects_bad_format() {
        let err = parse_plan_id("starter-plan").unwrap_err();
        assert!(matches!(err, AppError::InvalidPlanId(raw) if raw == "starter-plan"));
    }
}
