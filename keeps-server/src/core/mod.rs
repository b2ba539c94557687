//! Core Module
//!
//! Configuration, server state and the HTTP server lifecycle.

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::{Server, build_app};
pub use state::ServerState;
