//! Cart Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// A pending, mutable customization selection not yet committed to an order.
///
/// Product name and price are snapshots taken at add-to-cart time, not live
/// references, so later catalog edits do not ripple into open carts.
/// Customization fields default to empty strings; identity matching for the
/// merge-on-add policy compares them byte-for-byte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Owning user - every query on this table is scoped by owner
    pub owner: RecordId,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: i64,
    pub base_color: String,
    pub customization_text: String,
    pub design_image_url: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Add-to-cart payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CartItemCreate {
    #[validate(length(min = 1, max = 200))]
    pub product_name: String,
    pub price: Decimal,
    #[validate(range(min = 1))]
    pub quantity: i64,
    /// Defaults to "White"
    pub base_color: Option<String>,
    pub customization_text: Option<String>,
    pub design_image_url: Option<String>,
}

impl CartItemCreate {
    /// Default base color when none is supplied
    pub const DEFAULT_COLOR: &'static str = "White";

    /// Normalized base color
    pub fn color(&self) -> String {
        match self.base_color.as_deref() {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => Self::DEFAULT_COLOR.to_string(),
        }
    }

    /// Normalized customization text (empty string when absent)
    pub fn text(&self) -> String {
        self.customization_text.clone().unwrap_or_default()
    }

    /// Normalized design image (empty string when absent)
    pub fn image(&self) -> String {
        self.design_image_url.clone().unwrap_or_default()
    }
}
