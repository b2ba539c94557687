//! Order Repository
//!
//! Read access to placed orders plus the administrative status transition.
//! Order creation goes exclusively through the checkout conversion engine,
//! which writes the order, its items and the cart deletion in one
//! transaction.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderItem, OrderStatus, now_millis};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Whether an order already uses this human-facing code
    pub async fn code_exists(&self, code: &str) -> RepoResult<bool> {
        let found: Option<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE order_id = $code LIMIT 1")
            .bind(("code", code.to_string()))
            .await?
            .take(0)?;
        Ok(found.is_some())
    }

    /// List a user's orders, newest first
    pub async fn find_for_owner(&self, owner: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE owner = $owner ORDER BY created_at DESC")
            .bind(("owner", owner.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find an order by record id, only if it belongs to the user
    pub async fn find_by_id_for_owner(
        &self,
        owner: &RecordId,
        id: &RecordId,
    ) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE id = $id AND owner = $owner LIMIT 1")
            .bind(("id", id.clone()))
            .bind(("owner", owner.clone()))
            .await?
            .take(0)?;
        Ok(order)
    }

    /// Items of one order
    pub async fn items_for_order(&self, order_id: &RecordId) -> RepoResult<Vec<OrderItem>> {
        let items: Vec<OrderItem> = self
            .base
            .db()
            .query("SELECT * FROM order_item WHERE order = $order")
            .bind(("order", order_id.clone()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Administrative forward-only status transition
    pub async fn update_status(&self, id: &RecordId, next: OrderStatus) -> RepoResult<Order> {
        let order: Option<Order> = self.base.db().select(id.clone()).await?;
        let order = order.ok_or_else(|| RepoError::NotFound(format!("Order {}", id)))?;

        if !order.status.can_transition_to(next) {
            return Err(RepoError::Validation(format!(
                "cannot move order {} from {:?} to {:?}",
                order.order_id, order.status, next
            )));
        }

        let updated: Option<Order> = self
            .base
            .db()
            .query("UPDATE $id SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("status", next))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Order {}", id)))
    }
}
