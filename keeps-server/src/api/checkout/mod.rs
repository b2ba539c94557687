//! Checkout API module

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub use handler::{PayRequest, PayResponse, PreviewCouponRequest};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/checkout/pay", post(handler::pay))
        .route("/api/checkout/preview_coupon", post(handler::preview_coupon))
}
