//! Generic business record and its create/update DTOs.
//!
//! A business always carries a category tag plus a weak reference
//! (`category_ref`) into the record table named by `category_model`. The
//! two tag columns are kept in lockstep by the business service; the
//! reference is deliberately not a cascading foreign key, so records
//! orphaned by a category switch stay retrievable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::category::CategoryTag;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub owner_name: Option<String>,
    pub location: serde_json::Value,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub social_links: serde_json::Value,
    pub business_hours: serde_json::Value,
    pub experience: Option<String>,
    pub description: Option<String>,
    pub category: CategoryTag,
    pub category_model: CategoryTag,
    pub category_ref: Option<Uuid>,
    pub services: serde_json::Value,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,
    pub certificate_images: serde_json::Value,
    pub gallery_images: serde_json::Value,
    pub sales_executive: Option<Uuid>,
    pub plan_id: Option<Uuid>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the per-visitor view log.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BusinessViewEvent {
    pub id: Uuid,
    pub business_id: Uuid,
    pub visitor_ip: String,
    pub visitor_user_id: Option<Uuid>,
    pub viewed_at: DateTime<Utc>,
}

/// A single opening-hours entry. Absent fields normalize to empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessHoursEntry {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub open: String,
    #[serde(default)]
    pub close: String,
}

/// Normalize a businessHours input into an ordered entry list.
///
/// Multipart clients send the value as a JSON-encoded string; JSON clients
/// send the array directly. Both are accepted.
pub fn parse_business_hours(raw: &serde_json::Value) -> Result<Vec<BusinessHoursEntry>, AppError> {
    let value = match raw {
        serde_json::Value::String(s) => {
            if s.trim().is_empty() {
                serde_json::Value::Array(Vec::new())
            } else {
                serde_json::from_str(s)
                    .map_err(|_| AppError::MalformedInput("businessHours".to_string()))?
            }
        }
        other => other.clone(),
    };

    serde_json::from_value(value).map_err(|_| AppError::MalformedInput("businessHours".to_string()))
}

/// Input for creating a business listing.
///
/// `category` stays a raw string here; the business service resolves it
/// through the category registry so unregistered tags fail with the
/// dedicated error rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBusiness {
    pub name: String,
    pub owner_id: Uuid,
    pub owner_name: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub location: Option<serde_json::Value>,
    pub social_links: Option<serde_json::Value>,
    pub business_hours: Option<serde_json::Value>,
    pub experience: Option<String>,
    pub description: Option<String>,
    pub category: String,
    pub services: Option<serde_json::Value>,
    pub category_data: Option<serde_json::Value>,
    pub referral_code: Option<String>,
    pub plan_id: Option<String>,
}

/// Patch input for updating a business listing.
///
/// Absent fields keep their previous value. Structured fields may arrive
/// JSON-encoded; the service decodes and applies them only when non-empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBusiness {
    pub name: Option<String>,
    pub owner_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub experience: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<serde_json::Value>,
    pub social_links: Option<serde_json::Value>,
    pub services: Option<serde_json::Value>,
    pub business_hours: Option<serde_json::Value>,
    pub category_data: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hours_accept_structured_array() {
        let raw = json!([{"day": "Mon", "open": "09:00", "close": "18:00"}]);
        let hours = parse_business_hours(&raw).unwrap();
        assert_eq!(hours.len(), 1);
        assert_eq!(hours[0].day, "Mon");
        assert_eq!(hours[0].close, "18:00");
    }

    #[test]
    fn hours_accept_json_encoded_string() {
        let raw = json!("[{\"day\": \"Tue\", \"open\": \"10:00\"}]");
        let hours = parse_business_hours(&raw).unwrap();
        assert_eq!(hours.len(), 1);
        assert_eq!(hours[0].day, "Tue");
        assert_eq!(hours[0].open, "10:00");
    }

    #[test]
    fn hours_default_absent_fields_to_empty_string() {
        let raw = json!([{"day": "Sun"}, {}]);
        let hours = parse_business_hours(&raw).unwrap();
        assert_eq!(hours[0].open, "");
        assert_eq!(hours[0].close, "");
        assert_eq!(hours[1].day, "");
    }

    #[test]
    fn hours_empty_string_normalizes_to_no_entries() {
        let hours = parse_business_hours(&json!("")).unwrap();
        assert!(hours.is_empty());
    }

    #[test]
    fn hours_reject_malformed_json_string() {
        let err = parse_business_hours(&json!("not json")).unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(field) if field == "businessHours"));
    }

    #[test]
    fn create_business_validates_email_format() {
        let input = CreateBusiness {
            name: "City Clinic".to_string(),
            owner_id: Uuid::nil(),
            owner_name: None,
            phone: None,
            email: Some("not-an-email".to_string()),
            website: None,
            location: None,
            social_links: None,
            business_hours: None,
            experience: None,
            description: None,
            category: "Health".to_string(),
            services: None,
            category_data: None,
            referral_code: None,
            plan_id: None,
        };
        assert!(input.validate().is_err());
    }
}
