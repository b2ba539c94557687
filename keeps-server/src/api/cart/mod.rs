//! Cart API module

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/cart", get(handler::list).post(handler::add))
        .route("/api/cart/clear", delete(handler::clear))
        .route("/api/cart/{id}", delete(handler::delete_item))
}
