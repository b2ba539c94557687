//! Coupon discount calculation
//!
//! Single source of truth for the discount arithmetic: the preview endpoint
//! and the order conversion engine both call [`quote`], so the price a client
//! is shown and the amount recorded on the order can never diverge.
//!
//! Monetary values are rounded to 2 decimal places, half-up
//! (`MidpointAwayFromZero`).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::repository::{CouponRepository, RepoResult};

/// Currency minor-unit precision (PHP centavos)
pub const DECIMAL_PLACES: u32 = 2;

/// Round a monetary value to minor-unit precision, half-up
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Discount for `percent` off `amount`, rounded to minor-unit precision
pub fn discount_amount(amount: Decimal, percent: Decimal) -> Decimal {
    round_money(amount * percent / Decimal::ONE_HUNDRED)
}

/// Result of applying (or failing to apply) a coupon to an amount
#[derive(Debug, Clone, Serialize)]
pub struct DiscountQuote {
    pub amount: Decimal,
    pub discount: Decimal,
    pub final_amount: Decimal,
    /// Stored code of the matched coupon, None when nothing applied
    pub coupon_code: Option<String>,
}

impl DiscountQuote {
    fn no_discount(amount: Decimal) -> Self {
        Self {
            amount,
            discount: Decimal::ZERO,
            final_amount: amount,
            coupon_code: None,
        }
    }
}

/// Compute the discount a coupon code would apply to `amount` at time `now`.
///
/// An absent, unknown, inactive or out-of-window code is not an error: it
/// yields a zero discount. Strict rejection, if a caller wants it, belongs
/// earlier in the flow.
pub async fn quote(
    db: &Surreal<Db>,
    code: Option<&str>,
    amount: Decimal,
    now: i64,
) -> RepoResult<DiscountQuote> {
    let code = match code.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => return Ok(DiscountQuote::no_discount(amount)),
    };

    let repo = CouponRepository::new(db.clone());
    match repo.find_valid(code, now).await? {
        Some(coupon) => {
            let discount = discount_amount(amount, coupon.discount_percent);
            Ok(DiscountQuote {
                amount,
                discount,
                final_amount: amount - discount,
                coupon_code: Some(coupon.code),
            })
        }
        None => {
            tracing::debug!(code, "coupon did not match, no discount applied");
            Ok(DiscountQuote::no_discount(amount))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn ten_percent_off_one_thousand_is_exact() {
        let discount = discount_amount(dec("1000.00"), dec("10"));
        assert_eq!(discount, dec("100.00"));
        assert_eq!(dec("1000.00") - discount, dec("900.00"));
    }

    #[test]
    fn rounds_half_up_to_centavos() {
        // 10% of 333.25 = 33.325 -> 33.33
        assert_eq!(discount_amount(dec("333.25"), dec("10")), dec("33.33"));
        // 15% of 100.05 = 15.0075 -> 15.01
        assert_eq!(discount_amount(dec("100.05"), dec("15")), dec("15.01"));
        // just below the midpoint stays down
        assert_eq!(discount_amount(dec("333.24"), dec("10")), dec("33.32"));
    }

    #[test]
    fn zero_percent_discounts_nothing() {
        assert_eq!(discount_amount(dec("500.00"), Decimal::ZERO), Decimal::ZERO);
    }
}
