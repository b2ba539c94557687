//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{User, UserCreate, now_millis};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Register a new user with a hashed password.
    ///
    /// The unique index on `username` rejects duplicates.
    pub async fn register(&self, data: UserCreate) -> RepoResult<User> {
        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {}", e)))?;

        let user = User {
            id: None,
            username: data.username.clone(),
            email: data.email,
            hash_pass,
            is_staff: false,
            created_at: now_millis(),
        };

        let created: Option<User> = self
            .base
            .db()
            .create(USER_TABLE)
            .content(user)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("user_username") {
                    RepoError::Duplicate(format!("Username '{}' is taken", data.username))
                } else {
                    RepoError::Database(msg)
                }
            })?;

        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await?
            .take(0)?;
        Ok(user)
    }
}
