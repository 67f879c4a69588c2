//! User directory model consumed by sales assignment and notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Sales,
    Admin,
    Superadmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Sales => "sales",
            UserRole::Admin => "admin",
            UserRole::Superadmin => "superadmin",
        }
    }
}

/// Full user row from the directory.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub referral_code: Option<String>,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Public user profile — what listings expose about an assigned sales
/// executive or a reviewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar: Option<String>,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            full_name: u.full_name,
            email: u.email,
            role: u.role,
            avatar: u.avatar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&UserRole::Superadmin).unwrap();
        assert_eq!(json, "\"superadmin\"");
    }

    #[test]
    fn profile_drops_referral_code() {
        let user = User {
            id: Uuid::nil(),
            full_name: "Asha Pillai".to_string(),
            email: "asha@example.com".to_string(),
            role: UserRole::Sales,
            referral_code: Some("ASHA-42".to_string()),
            avatar: None,
            is_active: true,
            created_at: Utc::now(),
        };
        let profile: UserProfile = user.into();
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("referral_code"));
        assert!(!json.contains("ASHA-42"));
    }
}
