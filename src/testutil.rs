//! Shared test helpers for `#[cfg(test)]` modules in the crate.

use std::sync::Arc;

use tempfile::TempDir;

use crate::auth::Authenticator;
use crate::config::{AuthConfig, Config, ServerConfig, TokenConfig};
use crate::storage::models::{SweetData, User};
use crate::storage::Database;
use crate::AppState;

/// Open a fresh database in a temporary directory.
///
/// Returns both the `Database` and the `TempDir` guard; the caller must
/// keep the `TempDir` alive for the duration of the test.
pub fn setup_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(temp_dir.path()).unwrap();
    (db, temp_dir)
}

/// A minimal `Config` suitable for unit tests, with cheap password hashing.
pub fn test_config() -> Config {
    Config {
        auth: AuthConfig {
            hash_iterations: 1,
            hash_memory_kib: 1024,
            ..AuthConfig::default()
        },
        server: ServerConfig {
            bind_address: "127.0.0.1:8080".to_string(),
            data_dir: "/tmp/test".to_string(),
            ..ServerConfig::default()
        },
        tokens: TokenConfig {
            secret: "unit-test-secret-that-is-long-enough".to_string(),
            ttl_seconds: 3600,
        },
    }
}

pub fn test_authenticator() -> Authenticator {
    Authenticator::new(&test_config().auth).unwrap()
}

/// Build a full `Arc<AppState>` around the given database.
pub fn test_state(db: Database) -> Arc<AppState> {
    Arc::new(AppState::new(test_config(), db).unwrap())
}

/// Create a `User` with a placeholder hash.
pub fn make_user(username: &str, role: &str) -> User {
    User {
        password_hash: format!("hash_{username}"),
        role: role.to_string(),
        username: username.to_string(),
    }
}

/// Create sweet data; `price` is a decimal literal such as `"2.5"`.
pub fn make_sweet(name: &str, category: &str, price: &str, quantity: u32) -> SweetData {
    SweetData {
        category: category.to_string(),
        name: name.to_string(),
        price: price.parse().unwrap(),
        quantity,
    }
}
