//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`auth`] - registration and login
//! - [`products`] - catalog (public reads, staff writes)
//! - [`cart`] - per-user cart management
//! - [`orders`] - order listing and cart conversion
//! - [`checkout`] - payment intents and coupon preview
//! - [`coupons`] - coupon administration (staff)

pub mod convert;

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod coupons;
pub mod health;
pub mod orders;
pub mod products;

use axum::Router;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(products::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(checkout::router())
        .merge(coupons::router())
}

/// Guard for administrative handlers
pub fn require_staff(user: &CurrentUser) -> AppResult<()> {
    if user.is_staff {
        Ok(())
    } else {
        Err(AppError::forbidden("Staff access required".to_string()))
    }
}
