//! Coupon API handlers
//!
//! Every operation here is an administrative (staff) action. Shoppers never
//! see this surface; they only feel coupons through the checkout preview and
//! the order conversion.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::api::convert::{parse_record_id, record_id_to_string};
use crate::api::require_staff;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Coupon, CouponCreate, CouponUpdate};
use crate::db::repository::CouponRepository;
use crate::utils::{AppError, AppResult};

const COUPON_TABLE: &str = "coupon";

#[derive(Debug, Serialize)]
pub struct CouponResponse {
    pub id: String,
    pub code: String,
    pub discount_percent: Decimal,
    pub valid_from: i64,
    pub valid_to: i64,
    pub active: bool,
}

impl From<Coupon> for CouponResponse {
    fn from(c: Coupon) -> Self {
        Self {
            id: c.id.as_ref().map(record_id_to_string).unwrap_or_default(),
            code: c.code,
            discount_percent: c.discount_percent,
            valid_from: c.valid_from,
            valid_to: c.valid_to,
            active: c.active,
        }
    }
}

/// GET /api/coupons - list all coupons (staff)
pub async fn list(
    user: CurrentUser,
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<CouponResponse>>> {
    require_staff(&user)?;

    let repo = CouponRepository::new(state.get_db());
    let coupons = repo.find_all().await?;
    Ok(Json(coupons.into_iter().map(Into::into).collect()))
}

/// POST /api/coupons - create a coupon (staff)
pub async fn create(
    user: CurrentUser,
    State(state): State<ServerState>,
    Json(payload): Json<CouponCreate>,
) -> AppResult<Json<CouponResponse>> {
    require_staff(&user)?;

    let repo = CouponRepository::new(state.get_db());
    let coupon = repo.create(payload).await?;
    tracing::info!(code = %coupon.code, "coupon created");
    Ok(Json(coupon.into()))
}

/// PUT /api/coupons/:id - update a coupon (staff)
pub async fn update(
    user: CurrentUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CouponUpdate>,
) -> AppResult<Json<CouponResponse>> {
    require_staff(&user)?;

    let rid = parse_record_id(COUPON_TABLE, &id)?;
    let repo = CouponRepository::new(state.get_db());
    let coupon = repo.update(&rid, payload).await?;
    Ok(Json(coupon.into()))
}

/// DELETE /api/coupons/:id - delete a coupon (staff)
pub async fn delete(
    user: CurrentUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    require_staff(&user)?;

    let rid = parse_record_id(COUPON_TABLE, &id)?;
    let repo = CouponRepository::new(state.get_db());
    if !repo.delete(&rid).await? {
        return Err(AppError::not_found(format!("Coupon {}", id)));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}
