//! sweet-shop - Inventory API for a confectionery shop
//!
//! This crate provides:
//! - Username/password registration and login with Argon2id password hashes
//! - Stateless HS256 bearer tokens (no server-side sessions)
//! - Per-request identity resolution middleware
//! - Sweet inventory CRUD, filtered search, and atomic purchase/restock
//! - redb embedded database (ACID, crash-safe)
//! - REST API with JSend responses

pub mod api;
pub mod auth;
pub mod config;
pub mod inventory;
pub mod storage;
#[cfg(test)]
pub mod testutil;
pub mod tokens;

use auth::{AuthError, Authenticator};
use config::Config;
use storage::Database;
use tokens::TokenService;

/// Shared application state
pub struct AppState {
    pub authenticator: Authenticator,
    pub config: Config,
    pub db: Database,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Result<Self, AuthError> {
        let authenticator = Authenticator::new(&config.auth)?;
        let tokens = TokenService::new(&config.tokens);
        Ok(Self {
            authenticator,
            config,
            db,
            tokens,
        })
    }
}
