//! Identity seam for the API: bearer-token verification exposed as the
//! [`CurrentUser`] extractor, plus token issuance and password hashing used
//! by the register/login handlers.

use crate::schemas::{AppState, ErrorResponse};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use model::entities::user;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Claims carried by an access token. `sub` holds the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Signing and verification keys derived from `JWT_SECRET`.
#[derive(Clone)]
pub struct AuthKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl AuthKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

// The jsonwebtoken key types are opaque; never print key material.
impl std::fmt::Debug for AuthKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthKeys { .. }")
    }
}

/// Issue an access token for the given user, valid for 24 hours.
pub fn issue_token(user_id: i32, keys: &AuthKeys) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(24)).timestamp(),
    };
    encode(&Header::default(), &claims, &keys.encoding)
}

/// Hash a password with argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = argon2::Argon2::default();
    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::password_hash::PasswordVerifier;
    if let Ok(parsed_hash) = argon2::PasswordHash::new(hash) {
        argon2::Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    } else {
        false
    }
}

/// Failures while resolving the principal for a request.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or malformed Authorization header")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("User no longer exists or is inactive")]
    UnknownUser,
    #[error("Internal error while resolving user")]
    Database,
}

impl AuthError {
    fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "AUTH_MISSING_TOKEN",
            AuthError::InvalidToken => "AUTH_INVALID_TOKEN",
            AuthError::UnknownUser => "AUTH_UNKNOWN_USER",
            AuthError::Database => "DATABASE_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AuthError::Database => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            success: false,
        };
        (self.status(), Json(body)).into_response()
    }
}

/// The authenticated principal, resolved from the bearer token on every
/// protected route. Handlers take this as an argument; a missing or invalid
/// token never reaches the handler body.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .ok_or(AuthError::MissingToken)?;

        let claims = decode::<Claims>(token, &state.auth.decoding, &Validation::default())
            .map_err(|decode_error| {
                debug!("Rejected bearer token: {}", decode_error);
                AuthError::InvalidToken
            })?
            .claims;

        let user_id: i32 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        match user::Entity::find_by_id(user_id).one(&state.db).await {
            Ok(Some(user_model)) if user_model.is_active => Ok(CurrentUser(user_model)),
            Ok(_) => {
                warn!("Token for user {} no longer resolves to an active user", user_id);
                Err(AuthError::UnknownUser)
            }
            Err(db_error) => {
                error!("Failed to load user {} for auth: {}", user_id, db_error);
                Err(AuthError::Database)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let keys = AuthKeys::from_secret("test-secret");
        let token = issue_token(42, &keys).unwrap();

        let claims = decode::<Claims>(&token, &keys.decoding, &Validation::default())
            .unwrap()
            .claims;
        assert_eq!(claims.sub, "42");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let keys = AuthKeys::from_secret("test-secret");
        let other = AuthKeys::from_secret("other-secret");
        let token = issue_token(42, &keys).unwrap();

        assert!(decode::<Claims>(&token, &other.decoding, &Validation::default()).is_err());
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert_ne!(hash, "hunter2hunter2");
        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("wrong-password", &hash));
        assert!(!verify_password("hunter2hunter2", "not-a-phc-string"));
    }
}
