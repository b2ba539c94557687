//! Checkout Module
//!
//! The core of the storefront: coupon discount calculation and the atomic
//! cart-to-order conversion.

pub mod conversion;
pub mod discount;

use thiserror::Error;

use crate::db::repository::RepoError;

pub use conversion::{OrderWithItems, create_order_from_cart};
pub use discount::{DiscountQuote, round_money};

/// Conversion engine errors
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Conversion never produces an order with no items
    #[error("cart is empty")]
    EmptyCart,

    /// Could not allocate an unused order code
    #[error("order code allocation exhausted retries")]
    CodeExhausted,

    #[error(transparent)]
    Repo(#[from] RepoError),
}
