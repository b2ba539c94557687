//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Catalog product - read-only reference data for clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub description: String,
    /// Unit price in PHP, 2 decimal places
    pub price: Decimal,
    pub image_url: Option<String>,
}

/// Create product payload (staff only)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
}

/// Update product payload (staff only)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
}
