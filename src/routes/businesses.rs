//! Business routes: creation, update, detail, listing, search, and
//! per-user dashboards.

use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::{ClientIp, CurrentUser, OptionalUser};
use crate::models::business::{Business, CreateBusiness, UpdateBusiness};
use crate::services::business::{self as business_service, BusinessWithSales};
use crate::services::dashboard::{self, OwnerAnalytics};
use crate::services::media::{self, MediaInput};
use crate::services::reader::{
    self, BusinessDetail, BusinessWithCategory, SalesBusinessSummary, ViewerIdentity,
};
use crate::AppState;

/// Collected multipart form: text fields plus stored media URLs per field.
struct ListingForm {
    fields: HashMap<String, String>,
    media: MediaInput,
}

/// Walk a multipart request, storing file parts and collecting the rest as
/// text. Files beyond a field's cap are skipped without error.
async fn collect_listing_form(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<ListingForm, AppError> {
    let mut fields = HashMap::new();
    let mut media = MediaInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "profile_image" | "cover_image" | "certificate_images" | "gallery_images" => {
                let file_name = field.file_name().unwrap_or("upload.bin").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read {name}: {e}"))
                })?;

                let (target, cap) = match name.as_str() {
                    "profile_image" => (&mut media.profile_image, 1),
                    "cover_image" => (&mut media.cover_image, 1),
                    "certificate_images" => {
                        (&mut media.certificate_images, media::MAX_CERTIFICATE_IMAGES)
                    }
                    _ => (&mut media.gallery_images, media::MAX_GALLERY_IMAGES),
                };
                if target.len() < cap {
                    let url = media::store_upload(&state.config, &file_name, &bytes).await?;
                    target.push(url);
                }
            }
            _ => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read {name}: {e}"))
                })?;
                fields.insert(name, text);
            }
        }
    }

    Ok(ListingForm { fields, media })
}

fn take(fields: &HashMap<String, String>, key: &str) -> Option<String> {
    fields
        .get(key)
        .map(|v| v.to_string())
        .filter(|v| !v.trim().is_empty())
}

fn take_json(fields: &HashMap<String, String>, key: &str) -> Option<serde_json::Value> {
    take(fields, key).map(serde_json::Value::String)
}

fn build_create_input(fields: &HashMap<String, String>) -> Result<CreateBusiness, AppError> {
    let name =
        take(fields, "name").ok_or_else(|| AppError::Validation("name is required".to_string()))?;
    let owner_id = take(fields, "owner_id")
        .ok_or_else(|| AppError::Validation("owner_id is required".to_string()))?
        .parse::<Uuid>()
        .map_err(|_| AppError::Validation("owner_id must be a UUID".to_string()))?;

    Ok(CreateBusiness {
        name,
        owner_id,
        owner_name: take(fields, "owner_name"),
        phone: take(fields, "phone"),
        email: take(fields, "email"),
        website: take(fields, "website"),
        location: take_json(fields, "location"),
        social_links: take_json(fields, "social_links"),
        business_hours: take_json(fields, "business_hours"),
        experience: take(fields, "experience"),
        description: take(fields, "description"),
        // An absent category falls through to registry resolution, which
        // rejects it as an unregistered tag.
        category: take(fields, "category").unwrap_or_default(),
        services: take_json(fields, "services"),
        category_data: take_json(fields, "category_data"),
        referral_code: take(fields, "referral_code"),
        plan_id: take(fields, "plan_id"),
    })
}

fn build_update_input(fields: &HashMap<String, String>) -> UpdateBusiness {
    UpdateBusiness {
        name: take(fields, "name"),
        owner_name: take(fields, "owner_name"),
        phone: take(fields, "phone"),
        email: take(fields, "email"),
        website: take(fields, "website"),
        experience: take(fields, "experience"),
        description: take(fields, "description"),
        category: take(fields, "category"),
        location: take_json(fields, "location"),
        social_links: take_json(fields, "social_links"),
        services: take_json(fields, "services"),
        business_hours: take_json(fields, "business_hours"),
        category_data: take_json(fields, "category_data"),
    }
}

/// POST /api/v1/businesses — create a listing (multipart, authenticated).
pub async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<BusinessWithSales>>, AppError> {
    let ListingForm { fields, media } = collect_listing_form(&state, &mut multipart).await?;
    let input = build_create_input(&fields)?;
    let business = business_service::create(&state.db, &input, media).await?;
    Ok(ApiResponse::success(business))
}

/// PUT /api/v1/businesses/{id} — update a listing (multipart, authenticated).
pub async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<Business>>, AppError> {
    let ListingForm { fields, media } = collect_listing_form(&state, &mut multipart).await?;
    let patch = build_update_input(&fields);
    let business = business_service::update(&state.db, id, &patch, media).await?;
    Ok(ApiResponse::success(business))
}

/// GET /api/v1/businesses/{id} — composed detail view; records the view
/// for the requesting visitor.
pub async fn get_by_id(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BusinessDetail>>, AppError> {
    let viewer = ViewerIdentity {
        ip,
        user_id: user.map(|u| u.id),
    };
    let detail = reader::get_detail(&state.db, id, &viewer).await?;
    Ok(ApiResponse::success(detail))
}

/// GET /api/v1/businesses — all listings with category details.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BusinessWithCategory>>>, AppError> {
    let listings = reader::list_all(&state.db).await?;
    Ok(ApiResponse::success(listings))
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub location: String,
}

/// GET /api/v1/businesses/search — tiered keyword/location search.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<Vec<Business>>>, AppError> {
    if params.keyword.trim().is_empty() && params.location.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide keyword or location".to_string(),
        ));
    }
    let results = reader::search(&state.db, &params.keyword, &params.location).await?;
    Ok(ApiResponse::success(results))
}

/// GET /api/v1/businesses/mine/analytics — view/review totals for the
/// authenticated owner's listings.
pub async fn owner_analytics(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<OwnerAnalytics>>, AppError> {
    let analytics = dashboard::owner_analytics(&state.db, user.id).await?;
    Ok(ApiResponse::success(analytics))
}

/// GET /api/v1/businesses/assigned — portfolio of the authenticated sales
/// executive.
pub async fn assigned(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<SalesBusinessSummary>>>, AppError> {
    let businesses = reader::list_by_sales(&state.db, user.id).await?;
    Ok(ApiResponse::success(businesses))
}
