//! Server state
//!
//! Shared handle to every service a handler needs. Cloning is shallow; all
//! members are cheap to clone or Arc-wrapped.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::payment::{MockGateway, PaymentGateway, StripeGateway};

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB, RocksDB backend)
    pub db: Surreal<Db>,
    /// JWT token service
    pub jwt_service: Arc<JwtService>,
    /// Payment-intent gateway
    pub gateway: Arc<dyn PaymentGateway>,
}

impl ServerState {
    /// Initialize all services from configuration
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir().join("keeps.db");
        let db_service = DbService::new(&db_path).await?;

        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

        let gateway: Arc<dyn PaymentGateway> = match &config.stripe_secret_key {
            Some(key) => Arc::new(StripeGateway::new(key.clone())),
            None => {
                tracing::warn!("STRIPE_SECRET_KEY not set, using mock payment gateway");
                Arc::new(MockGateway)
            }
        };

        Ok(Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service,
            gateway,
        })
    }

    /// Build state around an existing database and gateway (tests)
    pub fn with_parts(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            gateway,
        }
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
