//! Product Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use rust_decimal::Decimal;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products, alphabetical
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by record id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Product>> {
        let product: Option<Product> = self.base.db().select(id.clone()).await?;
        Ok(product)
    }

    /// Create a new product (administrative action)
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.price < Decimal::ZERO {
            return Err(RepoError::Validation("price must be non-negative".into()));
        }

        let product = Product {
            id: None,
            name: data.name,
            description: data.description.unwrap_or_default(),
            price: data.price,
            image_url: data.image_url,
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product (administrative action)
    pub async fn update(&self, id: &RecordId, data: ProductUpdate) -> RepoResult<Product> {
        let mut product = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {}", id)))?;

        if let Some(name) = data.name {
            product.name = name;
        }
        if let Some(description) = data.description {
            product.description = description;
        }
        if let Some(price) = data.price {
            if price < Decimal::ZERO {
                return Err(RepoError::Validation("price must be non-negative".into()));
            }
            product.price = price;
        }
        if let Some(image_url) = data.image_url {
            product.image_url = Some(image_url);
        }

        // id is implied by the update target; keep it out of the content
        product.id = None;

        let updated: Option<Product> = self
            .base
            .db()
            .update(id.clone())
            .content(product)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product {}", id)))
    }

    /// Delete a product (administrative action)
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<Product> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }
}
