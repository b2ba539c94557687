//! Cart API handlers
//!
//! Every handler acts only on the calling user's rows.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Serialize;
use validator::Validate;

use crate::api::convert::{parse_record_id, record_id_to_string};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CartItem, CartItemCreate};
use crate::db::repository::CartRepository;
use crate::utils::{AppError, AppResult};

const CART_TABLE: &str = "cart_item";

#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    pub id: String,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: i64,
    pub base_color: String,
    pub customization_text: String,
    pub design_image_url: String,
    pub created_at: i64,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id.as_ref().map(record_id_to_string).unwrap_or_default(),
            product_name: item.product_name,
            price: item.price,
            quantity: item.quantity,
            base_color: item.base_color,
            customization_text: item.customization_text,
            design_image_url: item.design_image_url,
            created_at: item.created_at,
        }
    }
}

/// GET /api/cart - the caller's cart, newest first
pub async fn list(
    user: CurrentUser,
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<CartItemResponse>>> {
    let owner = user.record_id()?;
    let repo = CartRepository::new(state.get_db());
    let items = repo.list_for_owner(&owner).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// POST /api/cart - add an item, merging exact duplicates.
///
/// Echoes the resulting (possibly merged) row.
pub async fn add(
    user: CurrentUser,
    State(state): State<ServerState>,
    Json(payload): Json<CartItemCreate>,
) -> AppResult<Json<CartItemResponse>> {
    payload.validate()?;

    let owner = user.record_id()?;
    let repo = CartRepository::new(state.get_db());
    let item = repo.add_item(&owner, payload).await?;
    Ok(Json(item.into()))
}

/// DELETE /api/cart/:id - remove one row
pub async fn delete_item(
    user: CurrentUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let owner = user.record_id()?;
    let rid = parse_record_id(CART_TABLE, &id)?;
    let repo = CartRepository::new(state.get_db());
    if !repo.delete_item(&owner, &rid).await? {
        return Err(AppError::not_found(format!("Cart item {}", id)));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// DELETE /api/cart/clear - empty the caller's cart (idempotent)
pub async fn clear(
    user: CurrentUser,
    State(state): State<ServerState>,
) -> AppResult<Json<serde_json::Value>> {
    let owner = user.record_id()?;
    let repo = CartRepository::new(state.get_db());
    repo.clear_for_owner(&owner).await?;
    Ok(Json(serde_json::json!({ "cleared": true })))
}
