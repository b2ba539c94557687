//! Database Models
//!
//! Entity structs persisted in embedded SurrealDB, plus their create/update
//! payloads. Monetary fields use [`rust_decimal::Decimal`] throughout;
//! timestamps are epoch milliseconds.

pub mod cart_item;
pub mod coupon;
pub mod order;
pub mod product;
pub mod user;

pub use cart_item::{CartItem, CartItemCreate};
pub use coupon::{Coupon, CouponCreate, CouponUpdate};
pub use order::{Order, OrderItem, OrderStatus};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use user::{User, UserCreate};

/// Current time as epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
