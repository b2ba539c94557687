//! Orders API module

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub use handler::{OrderItemResponse, OrderResponse};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", get(handler::list))
        .route("/api/orders/create_from_cart", post(handler::create_from_cart))
        .route("/api/orders/{id}", get(handler::get_by_id))
        .route("/api/orders/{id}/status", patch(handler::update_status))
}
