use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/customkeeps | working directory (database, logs) |
/// | HTTP_PORT | 8000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | CURRENCY | php | ISO currency code sent to the payment gateway |
/// | STRIPE_SECRET_KEY | (unset) | payment provider key; mock gateway when absent |
/// | JWT_SECRET | (generated) | token signing secret, at least 32 bytes |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Currency code for payment intents
    pub currency: String,
    /// Payment provider secret; falls back to the mock gateway when unset
    pub stripe_secret_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/customkeeps".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            currency: std::env::var("CURRENCY")
                .unwrap_or_else(|_| "php".into())
                .to_lowercase(),
            stripe_secret_key: std::env::var("STRIPE_SECRET_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
        }
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the working directory layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}
