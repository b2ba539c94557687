//! Cart Repository
//!
//! Per-user cart rows with the merge-by-identity add policy. Every statement
//! here is scoped by `owner`, so one user can never see or mutate another
//! user's rows.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{CartItem, CartItemCreate, now_millis};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const CART_TABLE: &str = "cart_item";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Add an item to the user's cart.
    ///
    /// If a row with identical (product_name, base_color, customization_text,
    /// design_image_url) already exists, its quantity is incremented in place
    /// and the updated row returned. Any single differing field, the design
    /// image included, produces a distinct row.
    pub async fn add_item(&self, owner: &RecordId, data: CartItemCreate) -> RepoResult<CartItem> {
        if data.quantity < 1 {
            return Err(RepoError::Validation("quantity must be at least 1".into()));
        }

        let color = data.color();
        let text = data.text();
        let image = data.image();

        let existing: Option<CartItem> = self
            .base
            .db()
            .query(
                "SELECT * FROM cart_item \
                 WHERE owner = $owner \
                   AND product_name = $product_name \
                   AND base_color = $base_color \
                   AND customization_text = $customization_text \
                   AND design_image_url = $design_image_url \
                 LIMIT 1",
            )
            .bind(("owner", owner.clone()))
            .bind(("product_name", data.product_name.clone()))
            .bind(("base_color", color.clone()))
            .bind(("customization_text", text.clone()))
            .bind(("design_image_url", image.clone()))
            .await?
            .take(0)?;

        if let Some(found) = existing {
            let id = found
                .id
                .clone()
                .ok_or_else(|| RepoError::Database("cart row missing id".into()))?;
            let updated: Option<CartItem> = self
                .base
                .db()
                .query("UPDATE $id SET quantity += $qty, updated_at = $now RETURN AFTER")
                .bind(("id", id))
                .bind(("qty", data.quantity))
                .bind(("now", now_millis()))
                .await?
                .take(0)?;
            return updated
                .ok_or_else(|| RepoError::Database("Failed to merge cart item".to_string()));
        }

        let now = now_millis();
        let item = CartItem {
            id: None,
            owner: owner.clone(),
            product_name: data.product_name,
            price: data.price,
            quantity: data.quantity,
            base_color: color,
            customization_text: text,
            design_image_url: image,
            created_at: now,
            updated_at: now,
        };

        let created: Option<CartItem> = self
            .base
            .db()
            .create(CART_TABLE)
            .content(item)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cart item".to_string()))
    }

    /// List the user's cart, newest first
    pub async fn list_for_owner(&self, owner: &RecordId) -> RepoResult<Vec<CartItem>> {
        let items: Vec<CartItem> = self
            .base
            .db()
            .query("SELECT * FROM cart_item WHERE owner = $owner ORDER BY created_at DESC")
            .bind(("owner", owner.clone()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Delete a single row if it belongs to the user
    pub async fn delete_item(&self, owner: &RecordId, id: &RecordId) -> RepoResult<bool> {
        let deleted: Vec<CartItem> = self
            .base
            .db()
            .query("DELETE cart_item WHERE id = $id AND owner = $owner RETURN BEFORE")
            .bind(("id", id.clone()))
            .bind(("owner", owner.clone()))
            .await?
            .take(0)?;
        Ok(!deleted.is_empty())
    }

    /// Empty the user's cart. Idempotent, no-op when already empty.
    pub async fn clear_for_owner(&self, owner: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE cart_item WHERE owner = $owner")
            .bind(("owner", owner.clone()))
            .await?
            .check()?;
        Ok(())
    }
}
