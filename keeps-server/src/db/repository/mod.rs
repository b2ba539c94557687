//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

// Identity
pub mod user;

// Catalog
pub mod product;

// Cart and discounts
pub mod cart;
pub mod coupon;

// Orders
pub mod order;

// Re-exports
pub use cart::CartRepository;
pub use coupon::CouponRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" strings at the API boundary, RecordId internally.
//
//   - parse: let id: RecordId = "product:abc".parse()?;
//   - build: RecordId::from_table_key("product", "abc")
//   - CRUD:  db.select(id) / db.delete(id) take RecordId directly
// =============================================================================

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
