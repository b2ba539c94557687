//! Checkout handlers
//!
//! The pay handler charges exactly the amount the caller supplies: the
//! discount, if any, was already applied through the preview endpoint. An
//! earlier revision of this flow re-applied the coupon here as well, which
//! double-discounted the charge; the amount sent to the gateway and the
//! amount recorded on the order must come from one discount computation.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::checkout::discount;
use crate::core::ServerState;
use crate::db::models::now_millis;
use crate::payment::to_minor_units;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct PayRequest {
    /// Major-unit amount, already discount-adjusted by the caller
    pub amount: Decimal,
    /// Informational only - never used for arithmetic here
    pub coupon_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PayResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    #[serde(rename = "paymentIntentId")]
    pub payment_intent_id: String,
}

/// POST /api/checkout/pay - authorize a charge with the payment gateway
pub async fn pay(
    user: CurrentUser,
    State(state): State<ServerState>,
    Json(payload): Json<PayRequest>,
) -> AppResult<Json<PayResponse>> {
    let amount_minor = to_minor_units(payload.amount)?;

    if let Some(code) = payload.coupon_code.as_deref() {
        tracing::debug!(code, "coupon noted on payment request");
    }

    let intent = state
        .gateway
        .create_intent(amount_minor, &state.config.currency)
        .await?;

    tracing::info!(
        username = %user.username,
        amount_minor,
        intent = %intent.id,
        "payment intent created"
    );

    Ok(Json(PayResponse {
        client_secret: intent.client_secret,
        payment_intent_id: intent.id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PreviewCouponRequest {
    pub code: String,
    pub amount: Decimal,
}

/// POST /api/checkout/preview_coupon - read-only discount preview.
///
/// Uses exactly the same matching and rounding as order conversion, so the
/// price shown here is the price the order will record.
pub async fn preview_coupon(
    _user: CurrentUser,
    State(state): State<ServerState>,
    Json(payload): Json<PreviewCouponRequest>,
) -> AppResult<Json<discount::DiscountQuote>> {
    let quote = discount::quote(
        &state.get_db(),
        Some(payload.code.as_str()),
        payload.amount,
        now_millis(),
    )
    .await?;
    Ok(Json(quote))
}
