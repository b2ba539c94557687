//! Coupon API module

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub use handler::CouponResponse;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/coupons", get(handler::list).post(handler::create))
        .route(
            "/api/coupons/{id}",
            put(handler::update).delete(handler::delete),
        )
}
