//! Cart-to-order conversion engine
//!
//! Turns a user's cart into an immutable Order plus OrderItems, exactly once.
//! The order insert, the item inserts and the cart deletion run in a single
//! SurrealDB transaction guarded by a row-for-row re-check of the cart
//! snapshot, so a concurrent mutation from the same user either aborts the
//! conversion or happens after it, and the order always reflects the full
//! cart it was computed from.

use rust_decimal::Decimal;
use serde::Serialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use uuid::Uuid;

use crate::checkout::CheckoutError;
use crate::checkout::discount::{self, round_money};
use crate::db::models::{CartItem, Order, OrderItem, OrderStatus, now_millis};
use crate::db::repository::{CartRepository, OrderRepository, RepoError};

/// Human-facing order codes: 8 uppercase characters from a v4 UUID
const ORDER_CODE_LEN: usize = 8;

/// Attempts before giving up on finding an unused order code
const MAX_CODE_ATTEMPTS: u32 = 5;

const ORDER_TABLE: &str = "order";

/// A fully populated conversion result
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Generate a candidate order code
fn generate_order_code() -> String {
    Uuid::new_v4().simple().to_string()[..ORDER_CODE_LEN].to_uppercase()
}

/// Convert the user's cart into an order.
///
/// Fails with [`CheckoutError::EmptyCart`] when the cart has no rows. An
/// invalid, expired or inactive coupon code silently yields a zero discount.
/// On success the cart is empty and the returned order carries its persisted
/// items.
pub async fn create_order_from_cart(
    db: &Surreal<Db>,
    owner: &RecordId,
    coupon_code: Option<String>,
    payment_intent_id: Option<String>,
) -> Result<OrderWithItems, CheckoutError> {
    let cart_repo = CartRepository::new(db.clone());
    let cart = cart_repo.list_for_owner(owner).await?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    // Totals from the cart snapshot, exact decimal arithmetic
    let total_amount: Decimal = round_money(
        cart.iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum(),
    );

    let now = now_millis();
    let quote = discount::quote(db, coupon_code.as_deref(), total_amount, now).await?;

    let order_repo = OrderRepository::new(db.clone());
    let code = allocate_order_code(&order_repo).await?;

    let order_rid = RecordId::from_table_key(ORDER_TABLE, Uuid::new_v4().simple().to_string());
    let order = Order {
        id: None,
        owner: owner.clone(),
        order_id: code,
        total_amount,
        discount_amount: quote.discount,
        final_amount: quote.final_amount,
        coupon_code: quote.coupon_code,
        status: OrderStatus::Preparing,
        payment_intent_id,
        created_at: now,
        updated_at: now,
    };
    let items = order_items_from_cart(&order_rid, &cart);
    let snapshot = cart_snapshot(&cart)?;

    persist_conversion(db, owner, &order_rid, &order, &items, snapshot).await?;

    // Re-read items so callers see persisted record ids
    let items = order_repo.items_for_order(&order_rid).await?;
    let order = Order {
        id: Some(order_rid),
        ..order
    };

    tracing::info!(
        order_code = %order.order_id,
        total = %order.total_amount,
        discount = %order.discount_amount,
        items = items.len(),
        "cart converted to order"
    );

    Ok(OrderWithItems { order, items })
}

/// Snapshot cart rows into order items, copying customization verbatim
fn order_items_from_cart(order_rid: &RecordId, cart: &[CartItem]) -> Vec<OrderItem> {
    cart.iter()
        .map(|row| OrderItem {
            id: None,
            order: order_rid.clone(),
            product_name: row.product_name.clone(),
            price: row.price,
            quantity: row.quantity,
            base_color: row.base_color.clone(),
            customization_text: row.customization_text.clone(),
            design_image_url: row.design_image_url.clone(),
        })
        .collect()
}

/// Pick an order code no existing order uses.
///
/// The unique index on `order.order_id` still backstops the race where two
/// conversions pick the same code between this check and the commit.
async fn allocate_order_code(repo: &OrderRepository) -> Result<String, CheckoutError> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_order_code();
        if !repo.code_exists(&code).await? {
            return Ok(code);
        }
    }
    Err(CheckoutError::CodeExhausted)
}

/// Per-row stamp of the cart at snapshot time.
///
/// Quantity is the only cart field that can change in place (duplicate adds
/// merge via `quantity +=`), so id + quantity pins each row exactly.
#[derive(Debug, Clone, Serialize)]
struct CartRowStamp {
    id: RecordId,
    quantity: i64,
}

fn cart_snapshot(cart: &[CartItem]) -> Result<Vec<CartRowStamp>, CheckoutError> {
    cart.iter()
        .map(|row| {
            let id = row
                .id
                .clone()
                .ok_or_else(|| RepoError::Database("cart row missing id".into()))?;
            Ok(CartRowStamp {
                id,
                quantity: row.quantity,
            })
        })
        .collect()
}

/// All-or-nothing persistence step.
///
/// Re-reads the cart inside the transaction and throws unless it still
/// matches the snapshot row for row: same row count, and every snapshotted
/// row still present with its snapshotted quantity. Any mismatch cancels the
/// whole statement block: no order, no items, no cart deletion. A
/// unique-index violation on the order code aborts the same way.
async fn persist_conversion(
    db: &Surreal<Db>,
    owner: &RecordId,
    order_rid: &RecordId,
    order: &Order,
    items: &[OrderItem],
    snapshot: Vec<CartRowStamp>,
) -> Result<(), CheckoutError> {
    db.query(
        "BEGIN TRANSACTION;
         LET $live = (SELECT VALUE id FROM cart_item WHERE owner = $owner);
         IF array::len($live) != array::len($snapshot) { THROW 'cart changed during conversion' };
         FOR $row IN $snapshot {
             LET $qty = (SELECT VALUE quantity FROM $row.id)[0];
             IF $qty != $row.quantity { THROW 'cart changed during conversion' };
         };
         CREATE $order_rid CONTENT $order;
         FOR $item IN $items { CREATE order_item CONTENT $item; };
         DELETE cart_item WHERE owner = $owner;
         COMMIT TRANSACTION;",
    )
    .bind(("owner", owner.clone()))
    .bind(("snapshot", snapshot))
    .bind(("order_rid", order_rid.clone()))
    .bind(("order", order.clone()))
    .bind(("items", items.to_vec()))
    .await
    .map_err(RepoError::from)?
    .check()
    .map_err(RepoError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::CartItemCreate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn test_db() -> (tempfile::TempDir, Surreal<Db>) {
        let tmp = tempfile::tempdir().unwrap();
        let service = DbService::new(tmp.path()).await.unwrap();
        (tmp, service.db)
    }

    fn owner(key: &str) -> RecordId {
        RecordId::from_table_key("user", key)
    }

    fn item(name: &str, price: &str, qty: i64) -> CartItemCreate {
        CartItemCreate {
            product_name: name.to_string(),
            price: dec(price),
            quantity: qty,
            base_color: None,
            customization_text: None,
            design_image_url: None,
        }
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_and_creates_nothing() {
        let (_tmp, db) = test_db().await;
        let user = owner("empty");

        let err = create_order_from_cart(&db, &user, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));

        let orders = OrderRepository::new(db.clone())
            .find_for_owner(&user)
            .await
            .unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn order_code_is_short_and_uppercase() {
        let code = generate_order_code();
        assert_eq!(code.len(), ORDER_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn conversion_snapshots_items_and_empties_cart() {
        let (_tmp, db) = test_db().await;
        let user = owner("buyer");
        let cart_repo = CartRepository::new(db.clone());

        cart_repo.add_item(&user, item("Custom Mug", "300.00", 2)).await.unwrap();
        cart_repo.add_item(&user, item("Custom Tote Bag", "400.00", 1)).await.unwrap();

        let result = create_order_from_cart(&db, &user, None, Some("pi_test".into()))
            .await
            .unwrap();

        assert_eq!(result.order.total_amount, dec("1000.00"));
        assert_eq!(result.order.discount_amount, Decimal::ZERO);
        assert_eq!(result.order.final_amount, dec("1000.00"));
        assert_eq!(result.order.status, OrderStatus::Preparing);
        assert_eq!(result.order.payment_intent_id.as_deref(), Some("pi_test"));
        assert_eq!(result.items.len(), 2);

        let mug = result
            .items
            .iter()
            .find(|i| i.product_name == "Custom Mug")
            .unwrap();
        assert_eq!(mug.quantity, 2);
        assert_eq!(mug.price, dec("300.00"));
        assert_eq!(mug.base_color, "White");

        // Cart must be empty afterwards
        let remaining = cart_repo.list_for_owner(&user).await.unwrap();
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn failed_persistence_leaves_cart_intact() {
        let (_tmp, db) = test_db().await;
        let user = owner("atomic");
        let cart_repo = CartRepository::new(db.clone());

        cart_repo.add_item(&user, item("Custom Mug", "300.00", 2)).await.unwrap();
        let cart = cart_repo.list_for_owner(&user).await.unwrap();

        // Occupy an order code, then force the conversion to collide with it
        let taken = Order {
            id: None,
            owner: user.clone(),
            order_id: "AAAA1111".to_string(),
            total_amount: dec("1.00"),
            discount_amount: Decimal::ZERO,
            final_amount: dec("1.00"),
            coupon_code: None,
            status: OrderStatus::Preparing,
            payment_intent_id: None,
            created_at: 0,
            updated_at: 0,
        };
        let _created: Option<Order> = db.create(ORDER_TABLE).content(taken).await.unwrap();

        let order_rid =
            RecordId::from_table_key(ORDER_TABLE, Uuid::new_v4().simple().to_string());
        let colliding = Order {
            id: None,
            owner: user.clone(),
            order_id: "AAAA1111".to_string(),
            total_amount: dec("600.00"),
            discount_amount: Decimal::ZERO,
            final_amount: dec("600.00"),
            coupon_code: None,
            status: OrderStatus::Preparing,
            payment_intent_id: None,
            created_at: 0,
            updated_at: 0,
        };
        let items = order_items_from_cart(&order_rid, &cart);
        let snapshot = cart_snapshot(&cart).unwrap();

        let err = persist_conversion(&db, &user, &order_rid, &colliding, &items, snapshot).await;
        assert!(err.is_err(), "duplicate order code must abort the transaction");

        // Nothing partial: cart untouched, no items written
        let remaining = cart_repo.list_for_owner(&user).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].quantity, 2);

        let orphaned = OrderRepository::new(db.clone())
            .items_for_order(&order_rid)
            .await
            .unwrap();
        assert!(orphaned.is_empty());
    }

    #[tokio::test]
    async fn stale_snapshot_aborts_conversion() {
        let (_tmp, db) = test_db().await;
        let user = owner("stale");
        let cart_repo = CartRepository::new(db.clone());

        cart_repo.add_item(&user, item("Custom Mug", "300.00", 1)).await.unwrap();
        let cart = cart_repo.list_for_owner(&user).await.unwrap();

        // Cart changes between snapshot and persistence
        cart_repo.add_item(&user, item("Custom Tote Bag", "400.00", 1)).await.unwrap();

        let order_rid =
            RecordId::from_table_key(ORDER_TABLE, Uuid::new_v4().simple().to_string());
        let order = Order {
            id: None,
            owner: user.clone(),
            order_id: generate_order_code(),
            total_amount: dec("300.00"),
            discount_amount: Decimal::ZERO,
            final_amount: dec("300.00"),
            coupon_code: None,
            status: OrderStatus::Preparing,
            payment_intent_id: None,
            created_at: 0,
            updated_at: 0,
        };
        let items = order_items_from_cart(&order_rid, &cart);
        let snapshot = cart_snapshot(&cart).unwrap();

        let err = persist_conversion(&db, &user, &order_rid, &order, &items, snapshot).await;
        assert!(err.is_err(), "guard must reject a stale snapshot");

        let remaining = cart_repo.list_for_owner(&user).await.unwrap();
        assert_eq!(remaining.len(), 2);
    }

    #[tokio::test]
    async fn quantity_merge_after_snapshot_aborts_conversion() {
        let (_tmp, db) = test_db().await;
        let user = owner("merge-race");
        let cart_repo = CartRepository::new(db.clone());

        cart_repo.add_item(&user, item("Custom Mug", "300.00", 1)).await.unwrap();
        let cart = cart_repo.list_for_owner(&user).await.unwrap();
        let snapshot = cart_snapshot(&cart).unwrap();

        // A duplicate add merges in place: the row count stays at 1 while the
        // quantity moves to 2
        cart_repo.add_item(&user, item("Custom Mug", "300.00", 1)).await.unwrap();
        let merged = cart_repo.list_for_owner(&user).await.unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].quantity, 2);

        let order_rid =
            RecordId::from_table_key(ORDER_TABLE, Uuid::new_v4().simple().to_string());
        let order = Order {
            id: None,
            owner: user.clone(),
            order_id: generate_order_code(),
            total_amount: dec("300.00"),
            discount_amount: Decimal::ZERO,
            final_amount: dec("300.00"),
            coupon_code: None,
            status: OrderStatus::Preparing,
            payment_intent_id: None,
            created_at: 0,
            updated_at: 0,
        };
        let items = order_items_from_cart(&order_rid, &cart);

        let err = persist_conversion(&db, &user, &order_rid, &order, &items, snapshot).await;
        assert!(
            err.is_err(),
            "a merged quantity must abort even though the row count is unchanged"
        );

        // Neither unit was lost: the merged row survives untouched
        let remaining = cart_repo.list_for_owner(&user).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].quantity, 2);

        let orphaned = OrderRepository::new(db.clone())
            .items_for_order(&order_rid)
            .await
            .unwrap();
        assert!(orphaned.is_empty());
    }
}
