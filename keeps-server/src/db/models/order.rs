//! Order Models
//!
//! An order is an immutable snapshot produced by cart conversion. Totals are
//! computed once, at conversion time, from the cart rows - they are never
//! recomputed, so later catalog or cart changes cannot alter a placed order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order fulfillment status
///
/// Transitions are forward-only and performed administratively; they are not
/// part of the conversion workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Preparing,
    ReadyForDelivery,
    InTransit,
    Delivered,
    Completed,
}

impl OrderStatus {
    fn rank(self) -> u8 {
        match self {
            OrderStatus::Preparing => 0,
            OrderStatus::ReadyForDelivery => 1,
            OrderStatus::InTransit => 2,
            OrderStatus::Delivered => 3,
            OrderStatus::Completed => 4,
        }
    }

    /// Whether a transition to `next` moves the order forward
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        next.rank() > self.rank()
    }
}

/// Placed order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub owner: RecordId,
    /// Short human-facing code, 8 uppercase chars, unique across all orders
    pub order_id: String,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
    /// Coupon code snapshot - survives coupon deletion or expiry
    pub coupon_code: Option<String>,
    pub status: OrderStatus,
    /// Opaque handle from the payment gateway
    pub payment_intent_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Line item owned by exactly one order.
///
/// All customization fields are copied verbatim from the cart row at
/// conversion time and are fully decoupled from CartItem/Product afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub order: RecordId,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: i64,
    pub base_color: String,
    pub customization_text: String,
    pub design_image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_transitions_are_forward_only() {
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::ReadyForDelivery));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::InTransit.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::InTransit));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn status_serializes_snake_case() {
        let s = serde_json::to_string(&OrderStatus::ReadyForDelivery).unwrap();
        assert_eq!(s, "\"ready_for_delivery\"");
    }
}
