//! Composed read views over businesses: detail, listings, and tiered search.

use serde::Serialize;
use serde_json::json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::business::Business;
use crate::models::category::CategoryTag;
use crate::models::plan::PlanView;
use crate::models::review::ReviewView;
use crate::services::{category, plans, reviews, views};

/// Identity of the requesting visitor, used for view dedup.
#[derive(Debug, Clone)]
pub struct ViewerIdentity {
    pub ip: String,
    pub user_id: Option<Uuid>,
}

/// Fully composed business detail view.
#[derive(Debug, Serialize)]
pub struct BusinessDetail {
    pub total_views: i64,
    #[serde(flatten)]
    pub business: Business,
    pub category_data: serde_json::Value,
    pub reviews: Vec<ReviewView>,
    pub plan_data: Option<PlanView>,
}

/// A listing entry with its category record attached.
#[derive(Debug, Serialize)]
pub struct BusinessWithCategory {
    #[serde(flatten)]
    pub business: Business,
    pub category_data: serde_json::Value,
}

/// Fetch one business by id, record the view, and compose category data,
/// reviews, and plan data into a single response.
pub async fn get_detail(
    pool: &PgPool,
    id: Uuid,
    viewer: &ViewerIdentity,
) -> Result<BusinessDetail, AppError> {
    let mut business = sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Business not found".to_string()))?;

    let counted = views::record_view(pool, id, &viewer.ip, viewer.user_id).await?;
    if counted {
        business.views += 1;
    }

    let category_data = match business.category_ref {
        Some(record_id) => {
            category::fetch_public(pool, business.category_model, record_id)
                .await?
                .unwrap_or_else(|| json!({}))
        }
        None => json!({}),
    };

    let review_list = reviews::find_by_business(pool, id).await?;

    let plan_data = match business.plan_id {
        Some(plan_id) => plans::fetch_public(pool, plan_id).await?,
        None => None,
    };

    Ok(BusinessDetail {
        total_views: business.views,
        business,
        category_data,
        reviews: review_list,
        plan_data,
    })
}

/// Every business, each with its category record attached.
pub async fn list_all(pool: &PgPool) -> Result<Vec<BusinessWithCategory>, AppError> {
    let businesses =
        sqlx::query_as::<_, Business>("SELECT * FROM businesses ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;

    let mut listings = Vec::with_capacity(businesses.len());
    for business in businesses {
        let category_data = match business.category_ref {
            Some(record_id) => {
                category::fetch_public(pool, business.category_model, record_id)
                    .await?
                    .unwrap_or_else(|| json!({}))
            }
            None => json!({}),
        };
        listings.push(BusinessWithCategory {
            business,
            category_data,
        });
    }
    Ok(listings)
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", term.trim())
}

/// Three-tier fallback search.
///
/// Tier 1 matches the keyword against name/description/category tags and
/// the location against the city. Tier 2 retries without the location
/// constraint. Tier 3 scans every category table's speciality column and
/// re-queries businesses by the collected ids, re-applying the location
/// filter. The first non-empty tier wins.
pub async fn search(
    pool: &PgPool,
    keyword: &str,
    location: &str,
) -> Result<Vec<Business>, AppError> {
    let keyword_pattern = like_pattern(keyword);
    let location_pattern = like_pattern(location);
    let has_location = !location.trim().is_empty();

    const KEYWORD_MATCH: &str = "(name ILIKE $1 OR description ILIKE $1 \
                                 OR category::text ILIKE $1 OR category_model::text ILIKE $1)";

    let mut results = if has_location {
        sqlx::query_as::<_, Business>(&format!(
            "SELECT * FROM businesses WHERE {KEYWORD_MATCH} AND location->>'city' ILIKE $2"
        ))
        .bind(&keyword_pattern)
        .bind(&location_pattern)
        .fetch_all(pool)
        .await?
    } else {
        Vec::new()
    };

    if results.is_empty() {
        results = sqlx::query_as::<_, Business>(&format!(
            "SELECT * FROM businesses WHERE {KEYWORD_MATCH}"
        ))
        .bind(&keyword_pattern)
        .fetch_all(pool)
        .await?;
    }

    if results.is_empty() {
        let ids = category::speciality_business_ids(pool, &keyword_pattern).await?;
        if !ids.is_empty() {
            results = if has_location {
                sqlx::query_as::<_, Business>(
                    "SELECT * FROM businesses WHERE id = ANY($1) AND location->>'city' ILIKE $2",
                )
                .bind(&ids)
                .bind(&location_pattern)
                .fetch_all(pool)
                .await?
            } else {
                sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE id = ANY($1)")
                    .bind(&ids)
                    .fetch_all(pool)
                    .await?
            };
        }
    }

    Ok(results)
}

/// Summary row for a sales executive's portfolio listing.
#[derive(Debug, Clone, Serialize)]
pub struct SalesBusinessSummary {
    pub id: Uuid,
    pub title: String,
    pub owner: String,
    pub owner_email: String,
    pub category: CategoryTag,
    pub location: String,
    pub rating: f64,
    pub reviews: i64,
    pub views: i64,
    pub plan_id: Option<Uuid>,
    pub date: String,
    pub description: String,
}

/// Businesses attributed to a sales executive, summarized with owner
/// contact, review stats, and views.
pub async fn list_by_sales(
    pool: &PgPool,
    sales_user_id: Uuid,
) -> Result<Vec<SalesBusinessSummary>, AppError> {
    let rows = sqlx::query(
        "SELECT b.id, b.name, b.category, b.location, b.views, b.plan_id, \
         b.created_at, b.description, \
         COALESCE(u.full_name, '') AS owner_name, COALESCE(u.email, '') AS owner_email, \
         COALESCE(AVG(r.rating), 0)::float8 AS avg_rating, COUNT(r.id) AS review_count \
         FROM businesses b \
         LEFT JOIN users u ON u.id = b.owner_id \
         LEFT JOIN reviews r ON r.business_id = b.id \
         WHERE b.sales_executive = $1 \
         GROUP BY b.id, u.full_name, u.email \
         ORDER BY b.created_at DESC",
    )
    .bind(sales_user_id)
    .fetch_all(pool)
    .await?;

    let summaries = rows
        .into_iter()
        .map(|row| {
            let location: serde_json::Value = row.get("location");
            let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
            let avg_rating: f64 = row.get("avg_rating");
            let description: Option<String> = row.get("description");

            SalesBusinessSummary {
                id: row.get("id"),
                title: row.get("name"),
                owner: row.get("owner_name"),
                owner_email: row.get("owner_email"),
                category: row.get("category"),
                location: format_city_state(&location),
                rating: (avg_rating * 10.0).round() / 10.0,
                reviews: row.get("review_count"),
                views: row.get("views"),
                plan_id: row.get("plan_id"),
                date: created_at.format("%Y-%m-%d").to_string(),
                description: description.unwrap_or_default(),
            }
        })
        .collect();

    Ok(summaries)
}

/// "City, State" when a city is present, otherwise empty.
fn format_city_state(location: &serde_json::Value) -> String {
    match location.get("city").and_then(|c| c.as_str()) {
        Some(city) if !city.is_empty() => match location.get("state").and_then(|s| s.as_str()) {
            Some(state) if !state.is_empty() => format!("{city}, {state}"),
            _ => city.to_string(),
        },
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_and_trims() {
        assert_eq!(like_pattern("spa"), "%spa%");
        assert_eq!(like_pattern("  spa "), "%spa%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn city_state_formatting() {
        assert_eq!(
            format_city_state(&json!({"city": "Austin", "state": "TX"})),
            "Austin, TX"
        );
        assert_eq!(format_city_state(&json!({"city": "Austin"})), "Austin");
        assert_eq!(format_city_state(&json!({})), "");
        assert_eq!(format_city_state(&json!({"city": ""})), "");
    }
}
