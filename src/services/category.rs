//! Category registry: typed payload parsing and per-category record
//! persistence.
//!
//! All access to category-specific data funnels through here, keyed by the
//! closed `CategoryTag` enum. Each tag owns one record table; the payload
//! and patch enums carry the typed DTO for exactly one of them.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::beauty_spa::{BeautySpaRecord, CreateBeautySpa, UpdateBeautySpa};
use crate::models::category::CategoryTag;
use crate::models::health::{CreateHealth, HealthRecord, UpdateHealth};
use crate::models::hotel::{CreateHotel, HotelRecord, UpdateHotel};

/// Category-specific data for record creation.
#[derive(Debug, Clone)]
pub enum CategoryPayload {
    Health(CreateHealth),
    Hotel(CreateHotel),
    BeautySpa(CreateBeautySpa),
}

impl CategoryPayload {
    pub fn tag(&self) -> CategoryTag {
        match self {
            CategoryPayload::Health(_) => CategoryTag::Health,
            CategoryPayload::Hotel(_) => CategoryTag::Hotel,
            CategoryPayload::BeautySpa(_) => CategoryTag::BeautySpa,
        }
    }

    pub fn register_number(&self) -> &str {
        match self {
            CategoryPayload::Health(p) => &p.register_number,
            CategoryPayload::Hotel(p) => &p.register_number,
            CategoryPayload::BeautySpa(p) => &p.register_number,
        }
    }

    /// The mandatory registration number, rejected when blank or absent.
    pub fn require_register_number(&self) -> Result<&str, AppError> {
        let number = self.register_number().trim();
        if number.is_empty() {
            return Err(AppError::MissingRegistrationNumber);
        }
        Ok(number)
    }
}

/// Partial category-data patch applied to an existing record in place.
#[derive(Debug, Clone)]
pub enum CategoryPatch {
    Health(UpdateHealth),
    Hotel(UpdateHotel),
    BeautySpa(UpdateBeautySpa),
}

/// Decode a categoryData value into the typed payload for `tag`.
pub fn parse_payload(tag: CategoryTag, raw: serde_json::Value) -> Result<CategoryPayload, AppError> {
    let malformed = || AppError::MalformedInput("categoryData".to_string());
    match tag {
        CategoryTag::Health => serde_json::from_value(raw)
            .map(CategoryPayload::Health)
            .map_err(|_| malformed()),
        CategoryTag::Hotel => serde_json::from_value(raw)
            .map(CategoryPayload::Hotel)
            .map_err(|_| malformed()),
        CategoryTag::BeautySpa => serde_json::from_value(raw)
            .map(CategoryPayload::BeautySpa)
            .map_err(|_| malformed()),
    }
}

/// Decode a categoryData value into the typed patch for `tag`.
pub fn parse_patch(tag: CategoryTag, raw: serde_json::Value) -> Result<CategoryPatch, AppError> {
    let malformed = || AppError::MalformedInput("categoryData".to_string());
    match tag {
        CategoryTag::Health => serde_json::from_value(raw)
            .map(CategoryPatch::Health)
            .map_err(|_| malformed()),
        CategoryTag::Hotel => serde_json::from_value(raw)
            .map(CategoryPatch::Hotel)
            .map_err(|_| malformed()),
        CategoryTag::BeautySpa => serde_json::from_value(raw)
            .map(CategoryPatch::BeautySpa)
            .map_err(|_| malformed()),
    }
}

/// Check whether a registration number is already taken within a category.
pub async fn register_number_exists(
    pool: &PgPool,
    tag: CategoryTag,
    register_number: &str,
) -> Result<bool, AppError> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE register_number = $1)",
        tag.table()
    );
    let exists = sqlx::query_scalar::<_, bool>(&sql)
        .bind(register_number)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// Insert a category record with a back-reference to its business.
pub async fn create_record(
    pool: &PgPool,
    business_id: Uuid,
    payload: &CategoryPayload,
) -> Result<Uuid, AppError> {
    let id = match payload {
        CategoryPayload::Health(p) => {
            sqlx::query_scalar::<_, Uuid>(
                "INSERT INTO health_records \
                 (business_id, register_number, speciality, consultation_fee_cents, \
                  ambulance_available, facilities) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
            )
            .bind(business_id)
            .bind(p.register_number.trim())
            .bind(&p.speciality)
            .bind(p.consultation_fee_cents)
            .bind(p.ambulance_available)
            .bind(serde_json::to_value(&p.facilities).unwrap_or_default())
            .fetch_one(pool)
            .await?
        }
        CategoryPayload::Hotel(p) => {
            sqlx::query_scalar::<_, Uuid>(
                "INSERT INTO hotel_records \
                 (business_id, register_number, speciality, star_rating, room_count, \
                  check_in, check_out, amenities) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
            )
            .bind(business_id)
            .bind(p.register_number.trim())
            .bind(&p.speciality)
            .bind(p.star_rating)
            .bind(p.room_count)
            .bind(&p.check_in)
            .bind(&p.check_out)
            .bind(serde_json::to_value(&p.amenities).unwrap_or_default())
            .fetch_one(pool)
            .await?
        }
        CategoryPayload::BeautySpa(p) => {
            sqlx::query_scalar::<_, Uuid>(
                "INSERT INTO beauty_spa_records \
                 (business_id, register_number, speciality, appointment_required, \
                  stylist_count, treatments) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
            )
            .bind(business_id)
            .bind(p.register_number.trim())
            .bind(&p.speciality)
            .bind(p.appointment_required)
            .bind(p.stylist_count)
            .bind(serde_json::to_value(&p.treatments).unwrap_or_default())
            .fetch_one(pool)
            .await?
        }
    };
    Ok(id)
}

/// Merge a patch into an existing category record. Absent fields keep
/// their previous values.
pub async fn patch_record(
    pool: &PgPool,
    record_id: Uuid,
    patch: &CategoryPatch,
) -> Result<(), AppError> {
    match patch {
        CategoryPatch::Health(p) => {
            sqlx::query(
                "UPDATE health_records SET \
                 register_number = COALESCE($2, register_number), \
                 speciality = COALESCE($3, speciality), \
                 consultation_fee_cents = COALESCE($4, consultation_fee_cents), \
                 ambulance_available = COALESCE($5, ambulance_available), \
                 facilities = COALESCE($6, facilities) \
                 WHERE id = $1",
            )
            .bind(record_id)
            .bind(&p.register_number)
            .bind(&p.speciality)
            .bind(p.consultation_fee_cents)
            .bind(p.ambulance_available)
            .bind(p.facilities.as_ref().map(|f| serde_json::to_value(f).unwrap_or_default()))
            .execute(pool)
            .await?;
        }
        CategoryPatch::Hotel(p) => {
            sqlx::query(
                "UPDATE hotel_records SET \
                 register_number = COALESCE($2, register_number), \
                 speciality = COALESCE($3, speciality), \
                 star_rating = COALESCE($4, star_rating), \
                 room_count = COALESCE($5, room_count), \
                 check_in = COALESCE($6, check_in), \
                 check_out = COALESCE($7, check_out), \
                 amenities = COALESCE($8, amenities) \
                 WHERE id = $1",
            )
            .bind(record_id)
            .bind(&p.register_number)
            .bind(&p.speciality)
            .bind(p.star_rating)
            .bind(p.room_count)
            .bind(&p.check_in)
            .bind(&p.check_out)
            .bind(p.amenities.as_ref().map(|a| serde_json::to_value(a).unwrap_or_default()))
            .execute(pool)
            .await?;
        }
        CategoryPatch::BeautySpa(p) => {
            sqlx::query(
                "UPDATE beauty_spa_records SET \
                 register_number = COALESCE($2, register_number), \
                 speciality = COALESCE($3, speciality), \
                 appointment_required = COALESCE($4, appointment_required), \
                 stylist_count = COALESCE($5, stylist_count), \
                 treatments = COALESCE($6, treatments) \
                 WHERE id = $1",
            )
            .bind(record_id)
            .bind(&p.register_number)
            .bind(&p.speciality)
            .bind(p.appointment_required)
            .bind(p.stylist_count)
            .bind(p.treatments.as_ref().map(|t| serde_json::to_value(t).unwrap_or_default()))
            .execute(pool)
            .await?;
        }
    }
    Ok(())
}

/// Fetch a category record as public JSON, internal identity fields
/// (`id`, `business_id`) stripped.
pub async fn fetch_public(
    pool: &PgPool,
    tag: CategoryTag,
    record_id: Uuid,
) -> Result<Option<serde_json::Value>, AppError> {
    let value = match tag {
        CategoryTag::Health => {
            sqlx::query_as::<_, HealthRecord>("SELECT * FROM health_records WHERE id = $1")
                .bind(record_id)
                .fetch_optional(pool)
                .await?
                .map(|r| serde_json::to_value(r).unwrap_or_default())
        }
        CategoryTag::Hotel => {
            sqlx::query_as::<_, HotelRecord>("SELECT * FROM hotel_records WHERE id = $1")
                .bind(record_id)
                .fetch_optional(pool)
                .await?
                .map(|r| serde_json::to_value(r).unwrap_or_default())
        }
        CategoryTag::BeautySpa => {
            sqlx::query_as::<_, BeautySpaRecord>(
                "SELECT * FROM beauty_spa_records WHERE id = $1",
            )
            .bind(record_id)
            .fetch_optional(pool)
            .await?
            .map(|r| serde_json::to_value(r).unwrap_or_default())
        }
    };

    Ok(value.map(|mut v| {
        if let Some(obj) = v.as_object_mut() {
            obj.remove("id");
            obj.remove("business_id");
        }
        v
    }))
}

/// Collect business ids whose category record speciality matches a keyword
/// pattern, scanning every registered category table.
pub async fn speciality_business_ids(
    pool: &PgPool,
    keyword_pattern: &str,
) -> Result<Vec<Uuid>, AppError> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT business_id FROM health_records WHERE speciality ILIKE $1 \
         UNION \
         SELECT business_id FROM hotel_records WHERE speciality ILIKE $1 \
         UNION \
         SELECT business_id FROM beauty_spa_records WHERE speciality ILIKE $1",
    )
    .bind(keyword_pattern)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_payload_dispatches_on_tag() {
        let payload = parse_payload(
            CategoryTag::Hotel,
            json!({"register_number": "HT-9", "star_rating": 4}),
        )
        .unwrap();
        assert_eq!(payload.tag(), CategoryTag::Hotel);
        assert_eq!(payload.register_number(), "HT-9");
    }

    #[test]
    fn parse_payload_defaults_absent_register_number() {
        let payload = parse_payload(CategoryTag::Health, json!({})).unwrap();
        assert_eq!(payload.register_number(), "");
        assert!(matches!(
            payload.require_register_number(),
            Err(AppError::MissingRegistrationNumber)
        ));
    }

    #[test]
    fn require_register_number_rejects_whitespace() {
        let payload =
            parse_payload(CategoryTag::BeautySpa, json!({"register_number": "   "})).unwrap();
        assert!(payload.require_register_number().is_err());
    }

    #[test]
    fn require_register_number_trims() {
        let payload =
            parse_payload(CategoryTag::Health, json!({"register_number": " H-1 "})).unwrap();
        assert_eq!(payload.require_register_number().unwrap(), "H-1");
    }

    #[test]
    fn parse_payload_rejects_wrong_shape() {
        let err = parse_payload(CategoryTag::Health, json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(f) if f == "categoryData"));
    }

    #[test]
    fn parse_patch_accepts_partial_fields() {
        let patch = parse_patch(CategoryTag::Hotel, json!({"room_count": 42})).unwrap();
        match patch {
            CategoryPatch::Hotel(p) => {
                assert_eq!(p.room_count, Some(42));
                assert!(p.register_number.is_none());
            }
            other => panic!("unexpected patch: {other:?}"),
        }
    }
}
