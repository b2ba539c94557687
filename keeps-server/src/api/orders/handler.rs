//! Orders API handlers
//!
//! Conversion delegates to the checkout engine; everything else is read
//! access scoped to the calling user, plus the administrative status
//! transition.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::convert::{parse_record_id, record_id_to_string};
use crate::api::require_staff;
use crate::auth::CurrentUser;
use crate::checkout;
use crate::core::ServerState;
use crate::db::models::{Order, OrderItem, OrderStatus};
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};

const ORDER_TABLE: &str = "order";

#[derive(Debug, Deserialize)]
pub struct CreateFromCartRequest {
    pub coupon_code: Option<String>,
    pub payment_intent_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub id: String,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: i64,
    pub base_color: String,
    pub customization_text: String,
    pub design_image_url: String,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id.as_ref().map(record_id_to_string).unwrap_or_default(),
            product_name: item.product_name,
            price: item.price,
            quantity: item.quantity,
            base_color: item.base_color,
            customization_text: item.customization_text,
            design_image_url: item.design_image_url,
        }
    }
}

/// Full order representation, including the read-only derived echoes the
/// storefront frontend binds to (`date`, `total`, `discount`, `coupon`).
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub order_id: String,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    pub discount: Decimal,
    pub final_amount: Decimal,
    pub total: Decimal,
    pub coupon_code: Option<String>,
    pub coupon: Option<String>,
    pub status: OrderStatus,
    pub payment_intent_id: Option<String>,
    pub items: Vec<OrderItemResponse>,
    /// Creation date as YYYY-MM-DD
    pub date: String,
    pub created_at: i64,
}

impl OrderResponse {
    pub fn from_parts(order: Order, items: Vec<OrderItem>) -> Self {
        let date = chrono::DateTime::from_timestamp_millis(order.created_at)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        Self {
            id: order.id.as_ref().map(record_id_to_string).unwrap_or_default(),
            order_id: order.order_id,
            total_amount: order.total_amount,
            discount_amount: order.discount_amount,
            discount: order.discount_amount,
            final_amount: order.final_amount,
            total: order.final_amount,
            coupon_code: order.coupon_code.clone(),
            coupon: order.coupon_code,
            status: order.status,
            payment_intent_id: order.payment_intent_id,
            items: items.into_iter().map(Into::into).collect(),
            date,
            created_at: order.created_at,
        }
    }
}

/// POST /api/orders/create_from_cart - atomically convert the caller's cart
pub async fn create_from_cart(
    user: CurrentUser,
    State(state): State<ServerState>,
    Json(payload): Json<CreateFromCartRequest>,
) -> AppResult<Json<OrderResponse>> {
    let owner = user.record_id()?;
    let result = checkout::create_order_from_cart(
        &state.get_db(),
        &owner,
        payload.coupon_code,
        payload.payment_intent_id,
    )
    .await?;

    Ok(Json(OrderResponse::from_parts(result.order, result.items)))
}

/// GET /api/orders - the caller's orders, newest first
pub async fn list(
    user: CurrentUser,
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<OrderResponse>>> {
    let owner = user.record_id()?;
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_for_owner(&owner).await?;

    let mut responses = Vec::with_capacity(orders.len());
    for order in orders {
        let items = match &order.id {
            Some(id) => repo.items_for_order(id).await?,
            None => Vec::new(),
        };
        responses.push(OrderResponse::from_parts(order, items));
    }
    Ok(Json(responses))
}

/// GET /api/orders/:id - one of the caller's orders
pub async fn get_by_id(
    user: CurrentUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderResponse>> {
    let owner = user.record_id()?;
    let rid = parse_record_id(ORDER_TABLE, &id)?;
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id_for_owner(&owner, &rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    let items = repo.items_for_order(&rid).await?;
    Ok(Json(OrderResponse::from_parts(order, items)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// PATCH /api/orders/:id/status - administrative forward-only transition
pub async fn update_status(
    user: CurrentUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<OrderResponse>> {
    require_staff(&user)?;

    let rid = parse_record_id(ORDER_TABLE, &id)?;
    let repo = OrderRepository::new(state.get_db());
    let order = repo.update_status(&rid, payload.status).await?;
    let items = repo.items_for_order(&rid).await?;
    Ok(Json(OrderResponse::from_parts(order, items)))
}
