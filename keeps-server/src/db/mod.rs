//! Database Module
//!
//! Embedded SurrealDB (RocksDB backend) plus schema bootstrap.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "customkeeps";
const DATABASE: &str = "store";

/// Database service, owner of the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database under `db_path` and apply the schema.
    pub async fn new(db_path: &Path) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

        define_schema(&db)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {}", e)))?;

        tracing::info!(path = %db_path.display(), "Database connection established");

        Ok(Self { db })
    }
}

/// Idempotent schema bootstrap.
///
/// Tables stay schemaless; the indexes carry the invariants the application
/// depends on - unique usernames, unique coupon codes, and the unique
/// human-facing order code that the conversion transaction relies on to
/// reject collisions.
async fn define_schema(db: &Surreal<Db>) -> Result<(), surrealdb::Error> {
    db.query(
        "DEFINE INDEX IF NOT EXISTS user_username ON TABLE user FIELDS username UNIQUE;
         DEFINE INDEX IF NOT EXISTS coupon_code ON TABLE coupon FIELDS code UNIQUE;
         DEFINE INDEX IF NOT EXISTS order_code ON TABLE order FIELDS order_id UNIQUE;
         DEFINE INDEX IF NOT EXISTS cart_owner ON TABLE cart_item FIELDS owner;",
    )
    .await?
    .check()?;
    Ok(())
}
