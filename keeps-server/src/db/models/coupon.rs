//! Coupon Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Time-bounded percentage discount rule keyed by a unique code.
///
/// Codes are stored as entered but matched case-insensitively. A coupon
/// discounts only while `active` and `valid_from <= now <= valid_to`
/// (inclusive window, epoch millis).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub code: String,
    /// Percent, like 10 for 10%
    pub discount_percent: Decimal,
    pub valid_from: i64,
    pub valid_to: i64,
    pub active: bool,
}

/// Create coupon payload (staff only)
///
/// Percent bounds (0-100) are checked in the repository since validator
/// ranges do not apply to Decimal.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CouponCreate {
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    pub discount_percent: Decimal,
    pub valid_from: i64,
    pub valid_to: i64,
    pub active: Option<bool>,
}

/// Update coupon payload (staff only)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CouponUpdate {
    #[validate(length(min = 1, max = 32))]
    pub code: Option<String>,
    pub discount_percent: Option<Decimal>,
    pub valid_from: Option<i64>,
    pub valid_to: Option<i64>,
    pub active: Option<bool>,
}
