//! Authentication middleware
//!
//! Axum middleware enforcing JWT authentication on `/api/` routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;

/// Require a valid `Authorization: Bearer <token>` on every API route except
/// the public ones. On success the [`CurrentUser`] is injected into request
/// extensions for handlers and extractors.
///
/// # Public routes
///
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths (fall through to 404)
/// - `/api/health`
/// - `/api/auth/register`, `/api/auth/login`
/// - `GET /api/products` and `GET /api/products/{id}` (product listing)
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(uri = %req.uri(), "request without credentials");
            return Err(AppError::unauthorized());
        }
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(uri = %req.uri(), error = %e, "authentication failed");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

fn is_public_route(method: &http::Method, path: &str) -> bool {
    if path == "/api/health" || path == "/api/auth/register" || path == "/api/auth/login" {
        return true;
    }
    // Product reads are public; product mutation is not
    method == http::Method::GET && path.starts_with("/api/products")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_reads_are_public_but_writes_are_not() {
        assert!(is_public_route(&http::Method::GET, "/api/products"));
        assert!(is_public_route(&http::Method::GET, "/api/products/product:abc"));
        assert!(!is_public_route(&http::Method::POST, "/api/products"));
        assert!(!is_public_route(&http::Method::DELETE, "/api/products/product:abc"));
    }

    #[test]
    fn cart_and_orders_require_auth() {
        assert!(!is_public_route(&http::Method::GET, "/api/cart"));
        assert!(!is_public_route(&http::Method::POST, "/api/orders/create_from_cart"));
        assert!(!is_public_route(&http::Method::POST, "/api/checkout/pay"));
    }
}
