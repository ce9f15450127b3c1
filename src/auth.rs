//! Bearer token authentication.
//!
//! Tokens are HS256 JWTs issued by the user service. Only `access` tokens are
//! accepted, and a caller may only touch analytics under their own user id
//! (the token's `sub` claim).

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const ACCESS_TOKEN_TYPE: &str = "access";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Verify signature, expiry (when present) and token type.
pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        invalid_token()
    })?
    .claims;

    if claims.token_type.as_deref() != Some(ACCESS_TOKEN_TYPE) {
        return Err(invalid_token());
    }
    Ok(claims)
}

fn invalid_token() -> AppError {
    AppError::Unauthorized("Invalid or expired token".into())
}

/// The authenticated caller, together with the raw token so it can be
/// forwarded to the budgeting service.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub token: String,
}

impl AuthUser {
    /// Fails unless the caller owns `path_user_id`.
    pub fn require_user(&self, path_user_id: &str) -> AppResult<()> {
        if self.user_id != path_user_id {
            return Err(AppError::Forbidden(
                "You don't have permission to access this resource".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| {
                value
                    .strip_prefix("Bearer ")
                    .or_else(|| value.strip_prefix("bearer "))
            })
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

        let claims = verify_token(token, &state.config.jwt_secret)?;
        Ok(Self {
            user_id: claims.sub,
            token: token.to_string(),
        })
    }
}
