//! Customkeeps Server - custom merchandise store backend
//!
//! # Architecture overview
//!
//! - **Database** (`db`): embedded SurrealDB storage with typed repositories
//! - **Auth** (`auth`): JWT + Argon2 authentication
//! - **Checkout** (`checkout`): coupon discounts and atomic cart-to-order
//!   conversion
//! - **Payment** (`payment`): Stripe payment-intent gateway (mock fallback)
//! - **HTTP API** (`api`): RESTful handlers
//!
//! # Module structure
//!
//! ```text
//! keeps-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT auth, middleware, extractor
//! ├── api/           # HTTP routes and handlers
//! ├── checkout/      # discounts, order conversion
//! ├── payment/       # payment-intent gateway
//! ├── db/            # models and repositories
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod payment;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, build_app};
pub use db::DbService;
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: dotenv, working directories, logging
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    if config.environment == "production" {
        init_logger_with_file(Some("info"), log_dir.to_str());
    } else {
        init_logger();
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______           __
  / ____/_  _______/ /_____  ____ ___
 / /   / / / / ___/ __/ __ \/ __ `__ \
/ /___/ /_/ (__  ) /_/ /_/ / / / / / /
\____/\__,_/____/\__/\____/_/ /_/ /_/
    __ __
   / //_/__  ___  ____  _____
  / ,< / _ \/ _ \/ __ \/ ___/
 / /| /  __/  __/ /_/ (__  )
/_/ |_\___/\___/ .___/____/
              /_/
    "#
    );
}
