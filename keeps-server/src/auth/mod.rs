//! Authentication module
//!
//! JWT authentication and the current-user context:
//! - [`JwtService`] - token generation and validation
//! - [`CurrentUser`] - authenticated caller, available as an extractor
//! - [`require_auth`] - authentication middleware

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
