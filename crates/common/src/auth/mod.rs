//! Authentication and authorization utilities
//!
//! Provides:
//! - JWT token generation and validation
//! - The authenticated caller context used by handlers
//! - API key helpers for partner integrations

use crate::db::models::Role;
use crate::errors::{AppError, Result};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use std::sync::Arc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Extracted authentication context available to handlers
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Profile id of the caller
    pub user_id: Uuid,

    /// Resolved platform role
    pub role: Role,

    /// Request ID for tracing
    pub request_id: String,
}

impl AuthContext {
    /// Check whether the caller has the given role (admins pass every check)
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role || self.role == Role::Admin
    }

    /// Require a specific role, returning error if not present
    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(AppError::RoleRequired {
                role: String::from(role),
            })
        }
    }

    /// Require the admin role
    pub fn require_admin(&self) -> Result<()> {
        self.require_role(Role::Admin)
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (profile ID)
    pub sub: String,

    /// Platform role
    pub role: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// JWT token manager
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret
    pub fn new(secret: &str, expiration_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_secs: expiration_secs as i64,
        }
    }

    /// Generate a new JWT token
    pub fn generate_token(&self, user_id: Uuid, role: Role) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiration_secs);

        let claims = JwtClaims {
            sub: user_id.to_string(),
            role: String::from(role),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| AppError::Internal {
            message: format!("Failed to generate token: {}", e),
        })
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => AppError::InvalidToken,
            })
    }

    /// Decode claims into an AuthContext, rejecting unknown roles
    pub fn authenticate(&self, token: &str, request_id: String) -> Result<AuthContext> {
        let claims = self.validate_token(token)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;
        let role = Role::parse(&claims.role).ok_or(AppError::InvalidToken)?;

        Ok(AuthContext {
            user_id,
            role,
            request_id,
        })
    }
}

/// Axum extractor for AuthContext
///
/// Works with any application state that can hand out the shared
/// `JwtManager` via `FromRef`.
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
    Arc<JwtManager>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        // Request ID from the propagation layer, if present
        let request_id = parts
            .headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized {
                message: "Missing Authorization header".to_string(),
            })?;

        let token = extract_bearer_token(auth_header).ok_or_else(|| AppError::Unauthorized {
            message: "Authorization header must be a bearer token".to_string(),
        })?;

        let jwt = Arc::<JwtManager>::from_ref(state);
        jwt.authenticate(token, request_id)
    }
}

/// Hash an API key for storage
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Validate an API key against a stored hash
pub fn validate_api_key(api_key: &str, stored_hash: &str) -> bool {
    hash_api_key(api_key) == stored_hash
}

/// Generate a new partner API key
pub fn generate_api_key() -> String {
    let random_bytes: [u8; 32] = rand::random();
    format!("gf_{}", hex::encode(random_bytes))
}

/// Extract a bearer token from an Authorization header value
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_api_key() {
        let key = "gf_test_12345";
        let hash = hash_api_key(key);
        assert!(validate_api_key(key, &hash));
        assert!(!validate_api_key("wrong_key", &hash));
    }

    #[test]
    fn test_generate_api_key() {
        let key = generate_api_key();
        assert!(key.starts_with("gf_"));
        assert!(key.len() > 10);
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("abc"), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test_secret", 3600);

        let user_id = Uuid::new_v4();
        let token = manager.generate_token(user_id, Role::Mentor).unwrap();
        let ctx = manager.authenticate(&token, "req-1".to_string()).unwrap();

        assert_eq!(ctx.user_id, user_id);
        assert_eq!(ctx.role, Role::Mentor);
    }

    #[test]
    fn test_role_checks() {
        let ctx = AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::Mentor,
            request_id: "req-1".to_string(),
        };
        assert!(ctx.require_role(Role::Mentor).is_ok());
        assert!(ctx.require_admin().is_err());

        let admin = AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
            request_id: "req-2".to_string(),
        };
        // Admins pass every role gate
        assert!(admin.require_role(Role::Mentor).is_ok());
        assert!(admin.require_admin().is_ok());
    }
}
