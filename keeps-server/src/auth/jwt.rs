//! JWT token service
//!
//! Token generation, validation and the current-user context derived from
//! validated claims.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use thiserror::Error;

use crate::utils::AppError;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, generating a temporary development key");
            rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(48)
                .map(char::from)
                .collect()
        });

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "keeps-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "keeps-clients".to_string()),
        }
    }
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User record id (subject)
    pub sub: String,
    pub username: String,
    pub is_staff: bool,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

/// Authenticated caller context, injected by the auth middleware or the
/// [`CurrentUser`] extractor.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// "user:key" record id string
    pub id: String,
    pub username: String,
    pub is_staff: bool,
}

impl CurrentUser {
    /// The caller's record id for owner-scoped queries
    pub fn record_id(&self) -> Result<RecordId, AppError> {
        self.id
            .parse()
            .map_err(|_| AppError::internal(format!("malformed user id '{}'", self.id)))
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            is_staff: claims.is_staff,
        }
    }
}

/// JWT token service
pub struct JwtService {
    config: JwtConfig,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding,
            decoding,
        }
    }

    /// Generate a signed access token for a user
    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        is_staff: bool,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            is_staff,
            exp: (now + Duration::minutes(self.config.expiration_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }

    /// Extract the bearer token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim)
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new(JwtConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-test-secret-test-secret!".to_string(),
            expiration_minutes: 60,
            issuer: "keeps-server".to_string(),
            audience: "keeps-clients".to_string(),
        })
    }

    #[test]
    fn round_trips_claims() {
        let svc = test_service();
        let token = svc.generate_token("user:alice", "alice", false).unwrap();
        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user:alice");
        assert_eq!(claims.username, "alice");
        assert!(!claims.is_staff);
    }

    #[test]
    fn rejects_garbage_tokens() {
        let svc = test_service();
        assert!(matches!(
            svc.validate_token("not-a-token"),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn extracts_bearer_tokens() {
        assert_eq!(
            JwtService::extract_from_header("Bearer abc.def.ghi"),
            Some("abc.def.ghi")
        );
        assert_eq!(JwtService::extract_from_header("Basic zzz"), None);
    }
}
