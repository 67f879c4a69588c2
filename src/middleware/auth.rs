//! JWT authentication extractors and visitor identity resolution.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRole;
use crate::AppState;

/// Claims carried by access tokens issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub role: UserRole,
    pub exp: i64,
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized)
}

/// Authenticated user extracted from JWT Bearer token.
///
/// Use as an Axum extractor in handlers that require authentication:
/// ```ignore
/// async fn handler(current_user: CurrentUser) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: UserRole,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let claims = validate_token(token, &state.config.jwt_secret)?;

        let user_id: Uuid = claims.sub.parse().map_err(|_| AppError::Unauthorized)?;

        Ok(CurrentUser {
            id: user_id,
            role: claims.role,
        })
    }
}

/// Optional authentication for endpoints serving both audiences: anonymous
/// or invalid-token requests resolve to `None` instead of rejecting.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(
            CurrentUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}

/// Visitor IP taken from the first X-Forwarded-For hop, falling back to
/// the socket peer address.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let ip = match forwarded {
            Some(ip) => ip,
            None => parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
                .ok_or_else(|| AppError::Internal("Peer address unavailable".to_string()))?,
        };

        Ok(ClientIp(normalize_ip(ip)))
    }
}

/// Strip the IPv4-mapped IPv6 prefix so the same client matches across
/// stacks.
fn normalize_ip(ip: String) -> String {
    match ip.strip_prefix("::ffff:") {
        Some(v4) => v4.to_string(),
        None => ip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_mapped_prefix() {
        assert_eq!(normalize_ip("::ffff:10.0.0.1".to_string()), "10.0.0.1");
        assert_eq!(normalize_ip("203.0.113.9".to_string()), "203.0.113.9");
        assert_eq!(normalize_ip("2001:db8::1".to_string()), "2001:db8::1");
    }

    #[test]
    fn expired_or_garbage_tokens_are_unauthorized() {
        let err = validate_token("not-a-jwt", "secret").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
