//! Product API handlers
//!
//! Reads are public; mutation is an administrative (staff) action.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Serialize;
use validator::Validate;

use crate::api::convert::{parse_record_id, record_id_to_string};
use crate::api::require_staff;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::ProductRepository;
use crate::utils::{AppError, AppResult};

const PRODUCT_TABLE: &str = "product";

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id.as_ref().map(record_id_to_string).unwrap_or_default(),
            name: p.name,
            description: p.description,
            price: p.price,
            image_url: p.image_url,
        }
    }
}

/// GET /api/products - list the catalog (public)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ProductResponse>>> {
    let repo = ProductRepository::new(state.get_db());
    let products = repo.find_all().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /api/products/:id - single product (public)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductResponse>> {
    let rid = parse_record_id(PRODUCT_TABLE, &id)?;
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;
    Ok(Json(product.into()))
}

/// POST /api/products - create a product (staff)
pub async fn create(
    user: CurrentUser,
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ProductResponse>> {
    require_staff(&user)?;
    payload.validate()?;

    let repo = ProductRepository::new(state.get_db());
    let product = repo.create(payload).await?;
    tracing::info!(name = %product.name, "product created");
    Ok(Json(product.into()))
}

/// PUT /api/products/:id - update a product (staff)
pub async fn update(
    user: CurrentUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ProductResponse>> {
    require_staff(&user)?;
    payload.validate()?;

    let rid = parse_record_id(PRODUCT_TABLE, &id)?;
    let repo = ProductRepository::new(state.get_db());
    let product = repo.update(&rid, payload).await?;
    Ok(Json(product.into()))
}

/// DELETE /api/products/:id - delete a product (staff)
pub async fn delete(
    user: CurrentUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    require_staff(&user)?;

    let rid = parse_record_id(PRODUCT_TABLE, &id)?;
    let repo = ProductRepository::new(state.get_db());
    if !repo.delete(&rid).await? {
        return Err(AppError::not_found(format!("Product {}", id)));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}
