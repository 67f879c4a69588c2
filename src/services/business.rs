//! Business aggregate: listing creation, update, and category switching.
//!
//! Creation deliberately runs as a sequence of independent writes rather
//! than one transaction: a failure after the generic record is inserted but
//! before the category record is linked leaves an orphaned business row,
//! which is an accepted degraded state. Lead creation and notifications are
//! best-effort and never fail the call.

use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::business::{
    parse_business_hours, Business, CreateBusiness, UpdateBusiness,
};
use crate::models::category::CategoryTag;
use crate::models::lead::CreateLead;
use crate::models::notification::NotificationPayload;
use crate::models::user::{User, UserProfile};
use crate::services::media::MediaInput;
use crate::services::{category, leads, notifications, plans, sales, users};

/// A business with its assigned sales executive resolved to a profile,
/// returned from the creation flow.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessWithSales {
    #[serde(flatten)]
    pub business: Business,
    pub sales_executive_profile: Option<UserProfile>,
}

/// Decode a structured field that multipart clients send JSON-encoded.
///
/// Strings are parsed as JSON; everything else passes through. An empty
/// string decodes to null so it reads as "not supplied".
fn decode_structured(field: &str, raw: &serde_json::Value) -> Result<serde_json::Value, AppError> {
    match raw {
        serde_json::Value::String(s) => {
            if s.trim().is_empty() {
                Ok(serde_json::Value::Null)
            } else {
                serde_json::from_str(s).map_err(|_| AppError::MalformedInput(field.to_string()))
            }
        }
        other => Ok(other.clone()),
    }
}

/// An explicitly supplied but empty object is treated as "no change" on
/// update paths. Long-standing behavior: clients cannot clear these fields
/// by sending `{}`.
fn is_empty_object(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn decode_or_default(
    field: &str,
    raw: Option<&serde_json::Value>,
) -> Result<serde_json::Value, AppError> {
    let decoded = match raw {
        Some(value) => decode_structured(field, value)?,
        None => serde_json::Value::Null,
    };
    Ok(match decoded {
        serde_json::Value::Null => json!({}),
        other => other,
    })
}

/// Create a business listing with its category record, sales assignment,
/// and best-effort follow-up bookkeeping.
pub async fn create(
    pool: &PgPool,
    input: &CreateBusiness,
    media: MediaInput,
) -> Result<BusinessWithSales, AppError> {
    input
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // Validation order: category tag, registration number presence,
    // registration uniqueness, then plan.
    let tag = CategoryTag::resolve(&input.category)?;

    let category_value = decode_or_default("categoryData", input.category_data.as_ref())?;
    let payload = category::parse_payload(tag, category_value)?;
    let register_number = payload.require_register_number()?.to_string();

    if category::register_number_exists(pool, tag, &register_number).await? {
        return Err(AppError::DuplicateRegistration(register_number));
    }

    let plan_id = match input.plan_id.as_deref() {
        Some(raw) if !raw.trim().is_empty() => {
            let id = plans::parse_plan_id(raw)?;
            plans::find_by_id(pool, id)
                .await?
                .ok_or(AppError::PlanNotFound)?;
            Some(id)
        }
        _ => None,
    };

    let referral_code = input
        .referral_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let sales_executive = sales::resolve(pool, referral_code).await?;

    let location = decode_or_default("location", input.location.as_ref())?;
    let social_links = decode_or_default("socialLinks", input.social_links.as_ref())?;
    let services = decode_or_default("services", input.services.as_ref())?;
    let business_hours = match input.business_hours.as_ref() {
        Some(raw) => parse_business_hours(raw)?,
        None => Vec::new(),
    };

    let media = media.capped();

    let business = sqlx::query_as::<_, Business>(
        "INSERT INTO businesses (\
         name, owner_id, owner_name, location, phone, email, website, \
         social_links, business_hours, experience, description, \
         category, category_model, services, \
         profile_image, cover_image, certificate_images, gallery_images, \
         sales_executive, plan_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
                 $15, $16, $17, $18, $19, $20) \
         RETURNING *",
    )
    .bind(&input.name)
    .bind(input.owner_id)
    .bind(&input.owner_name)
    .bind(&location)
    .bind(&input.phone)
    .bind(&input.email)
    .bind(&input.website)
    .bind(&social_links)
    .bind(serde_json::to_value(&business_hours).unwrap_or_default())
    .bind(&input.experience)
    .bind(&input.description)
    .bind(tag)
    .bind(tag)
    .bind(&services)
    .bind(media.profile().cloned())
    .bind(media.cover().cloned())
    .bind(serde_json::to_value(&media.certificate_images).unwrap_or_default())
    .bind(serde_json::to_value(&media.gallery_images).unwrap_or_default())
    .bind(sales_executive.as_ref().map(|u| u.id))
    .bind(plan_id)
    .fetch_one(pool)
    .await?;

    // Category record with back-reference, then repoint the weak ref.
    let record_id = category::create_record(pool, business.id, &payload).await?;

    let business = sqlx::query_as::<_, Business>(
        "UPDATE businesses SET category_ref = $2 WHERE id = $1 RETURNING *",
    )
    .bind(business.id)
    .bind(record_id)
    .fetch_one(pool)
    .await?;

    create_follow_up_lead(pool, &business, sales_executive.as_ref()).await;
    dispatch_creation_notices(pool, &business, sales_executive.as_ref());

    Ok(BusinessWithSales {
        sales_executive_profile: sales_executive.map(UserProfile::from),
        business,
    })
}

/// Best-effort CRM lead for sales follow-up. Failures are logged only.
async fn create_follow_up_lead(pool: &PgPool, business: &Business, sales_executive: Option<&User>) {
    let owner = match users::find_by_id(pool, business.owner_id).await {
        Ok(Some(owner)) => owner,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(error = %e, business_id = %business.id, "Lead creation failed: owner lookup");
            return;
        }
    };

    let lead = CreateLead {
        name: owner.full_name,
        contact: owner.email,
        business_type: business.category.to_string(),
        status: "Interested".to_string(),
        notes: Some("Business listed on website".to_string()),
        sales_user: sales_executive.map(|u| u.id),
        follow_up_date: Some(Utc::now() + Duration::minutes(2)),
    };

    if let Err(e) = leads::create(pool, &lead).await {
        tracing::warn!(error = %e, business_id = %business.id, "Lead creation failed");
    }
}

/// Fire-and-forget notifications to the assigned sales executive and the
/// admin roles. Dispatched only after the primary records are durable.
fn dispatch_creation_notices(pool: &PgPool, business: &Business, sales_executive: Option<&User>) {
    if let Some(exec) = sales_executive {
        notifications::notify_user_detached(
            pool.clone(),
            exec.id,
            NotificationPayload {
                kind: "NEW_BUSINESS_BY_REFERRAL".to_string(),
                title: "New Business Listed".to_string(),
                message: format!(
                    "A new business \"{}\" was listed by your referred user.",
                    business.name
                ),
                data: json!({
                    "business_id": business.id,
                    "business_name": business.name,
                    "owner_id": business.owner_id,
                    "redirect_path": format!("/sales/business/{}", business.id),
                }),
            },
        );
    }

    let message = if sales_executive.is_some() {
        format!(
            "\"{}\" has been listed and assigned to a sales executive.",
            business.name
        )
    } else {
        format!(
            "\"{}\" has been listed but not yet assigned to any sales executive.",
            business.name
        )
    };

    notifications::notify_admin_roles_detached(
        pool.clone(),
        NotificationPayload {
            kind: "NEW_BUSINESS_LISTED".to_string(),
            title: "Business Listing Submitted".to_string(),
            message,
            data: json!({
                "business_id": business.id,
                "owner_id": business.owner_id,
                "assigned_to": sales_executive.map(|u| u.id),
                "redirect_path": format!("/admin/business/{}", business.id),
            }),
        },
    );
}

/// Apply a partial update to a business, including media replacement and
/// category data changes or a full category switch.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    patch: &UpdateBusiness,
    media: MediaInput,
) -> Result<Business, AppError> {
    // Decode structured inputs up front so malformed JSON is rejected
    // before anything is written.
    let location = match patch.location.as_ref() {
        Some(raw) => Some(decode_structured("location", raw)?),
        None => None,
    };
    let social_links = match patch.social_links.as_ref() {
        Some(raw) => Some(decode_structured("socialLinks", raw)?),
        None => None,
    };
    let services = match patch.services.as_ref() {
        Some(raw) => Some(decode_structured("services", raw)?),
        None => None,
    };
    let business_hours = match patch.business_hours.as_ref() {
        Some(raw) => Some(parse_business_hours(raw)?),
        None => None,
    };
    let category_value = match patch.category_data.as_ref() {
        Some(raw) => Some(decode_structured("categoryData", raw)?),
        None => None,
    };

    let existing = sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Business not found".to_string()))?;

    let media = media.capped();
    let profile_image = media.profile().cloned().or(existing.profile_image);
    let cover_image = media.cover().cloned().or(existing.cover_image);
    let certificate_images = if media.certificate_images.is_empty() {
        existing.certificate_images
    } else {
        serde_json::to_value(&media.certificate_images).unwrap_or_default()
    };
    let gallery_images = if media.gallery_images.is_empty() {
        existing.gallery_images
    } else {
        serde_json::to_value(&media.gallery_images).unwrap_or_default()
    };

    // Scalars replace only when explicitly supplied.
    let name = patch.name.clone().unwrap_or(existing.name);
    let owner_name = patch.owner_name.clone().or(existing.owner_name);
    let phone = patch.phone.clone().or(existing.phone);
    let email = patch.email.clone().or(existing.email);
    let website = patch.website.clone().or(existing.website);
    let experience = patch.experience.clone().or(existing.experience);
    let description = patch.description.clone().or(existing.description);

    // Empty objects are ignored, not applied — see is_empty_object.
    let location = match location {
        Some(value) if !is_empty_object(&value) => value,
        _ => existing.location,
    };
    let social_links = match social_links {
        Some(value) if !is_empty_object(&value) => value,
        _ => existing.social_links,
    };
    let services = match services {
        Some(value) if !is_empty_object(&value) => value,
        _ => existing.services,
    };
    let business_hours = match business_hours {
        Some(entries) if !entries.is_empty() => {
            serde_json::to_value(&entries).unwrap_or_default()
        }
        _ => existing.business_hours,
    };

    let mut new_category = existing.category;
    let mut new_category_model = existing.category_model;
    let mut new_category_ref = existing.category_ref;

    match patch.category.as_deref() {
        Some(raw_tag) if raw_tag != existing.category.as_str() => {
            // Category switch: brand-new record, repoint the weak ref, and
            // leave the old record orphaned in its table.
            let switched_tag = CategoryTag::resolve(raw_tag)?;
            let payload =
                category::parse_payload(switched_tag, category_value.unwrap_or_else(|| json!({})))?;
            let register_number = payload.require_register_number()?.to_string();
            if category::register_number_exists(pool, switched_tag, &register_number).await? {
                return Err(AppError::DuplicateRegistration(register_number));
            }

            let record_id = category::create_record(pool, id, &payload).await?;
            new_category = switched_tag;
            new_category_model = switched_tag;
            new_category_ref = Some(record_id);
        }
        _ => {
            if let Some(value) = category_value {
                if !is_empty_object(&value) {
                    if let Some(record_id) = existing.category_ref {
                        let record_patch =
                            category::parse_patch(existing.category_model, value)?;
                        category::patch_record(pool, record_id, &record_patch).await?;
                    }
                }
            }
        }
    }

    let business = sqlx::query_as::<_, Business>(
        "UPDATE businesses SET \
         name = $2, owner_name = $3, phone = $4, email = $5, website = $6, \
         experience = $7, description = $8, location = $9, social_links = $10, \
         services = $11, business_hours = $12, \
         profile_image = $13, cover_image = $14, \
         certificate_images = $15, gallery_images = $16, \
         category = $17, category_model = $18, category_ref = $19, \
         updated_at = NOW() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&name)
    .bind(&owner_name)
    .bind(&phone)
    .bind(&email)
    .bind(&website)
    .bind(&experience)
    .bind(&description)
    .bind(&location)
    .bind(&social_links)
    .bind(&services)
    .bind(&business_hours)
    .bind(&profile_image)
    .bind(&cover_image)
    .bind(&certificate_images)
    .bind(&gallery_images)
    .bind(new_category)
    .bind(new_category_model)
    .bind(new_category_ref)
    .fetch_one(pool)
    .await?;

    Ok(business)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_structured_parses_encoded_strings() {
        let raw = json!("{\"city\": \"Austin\"}");
        let decoded = decode_structured("location", &raw).unwrap();
        assert_eq!(decoded["city"], "Austin");
    }

    #[test]
    fn decode_structured_passes_objects_through() {
        let raw = json!({"city": "Austin"});
        assert_eq!(decode_structured("location", &raw).unwrap(), raw);
    }

    #[test]
    fn decode_structured_treats_empty_string_as_absent() {
        let decoded = decode_structured("services", &json!("")).unwrap();
        assert!(decoded.is_null());
    }

    #[test]
    fn decode_structured_rejects_invalid_json() {
        let err = decode_structured("socialLinks", &json!("{oops")).unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(f) if f == "socialLinks"));
    }

    #[test]
    fn empty_objects_are_no_change() {
        assert!(is_empty_object(&json!({})));
        assert!(is_empty_object(&serde_json::Value::Null));
        assert!(!is_empty_object(&json!({"city": ""})));
        assert!(!is_empty_object(&json!({"instagram": "@spot"})));
    }
}
