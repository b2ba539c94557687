//! JWT Extractor
//!
//! Custom extractor for automatically validating JWT tokens

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;

/// Use this extractor in protected handlers to validate the JWT and obtain
/// the calling user.
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                tracing::warn!(uri = %parts.uri, "request without credentials");
                return Err(AppError::unauthorized());
            }
        };

        match state.jwt_service.validate_token(token) {
            Ok(claims) => {
                let user = CurrentUser::from(claims);
                // Store in extensions for potential reuse
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(uri = %parts.uri, error = %e, "authentication failed");
                match e {
                    crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                    _ => Err(AppError::invalid_token("Invalid token")),
                }
            }
        }
    }
}
