use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

use super::Identity;
use crate::config::AuthConfig;
use crate::storage::models::User;
use crate::storage::{Database, DatabaseError};

/// Role assigned to every self-registered user
pub const DEFAULT_ROLE: &str = "USER";

/// Minimum password length accepted at registration
const MIN_PASSWORD_LENGTH: usize = 8;

const MAX_USERNAME_LENGTH: usize = 64;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad credentials. Deliberately carries no detail about which part failed.
    #[error("Invalid username or password")]
    AuthFailed,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Invalid password hashing parameters: {0}")]
    InvalidParams(String),
    #[error("Failed to hash password")]
    PasswordHash,
    #[error("Username is already taken")]
    UsernameTaken,
    #[error("{0}")]
    ValidationFailed(String),
}

/// Validates credentials against the user store.
///
/// Unknown usernames are verified against a dummy hash so that both failure
/// paths do the same amount of work and return the same error.
#[derive(Clone)]
pub struct Authenticator {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl Authenticator {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            config.hash_memory_kib,
            config.hash_iterations,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| AuthError::InvalidParams(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let dummy_hash = hash_with(&argon2, "timing-equalizer-password")?;

        Ok(Self { argon2, dummy_hash })
    }

    /// Hash a password using Argon2id with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        hash_with(&self.argon2, password)
    }

    /// Create a user with the default role.
    pub fn register(
        &self,
        db: &Database,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username = username.trim();
        validate_registration(username, password)?;

        let user = User {
            password_hash: self.hash_password(password)?,
            role: DEFAULT_ROLE.to_string(),
            username: username.to_string(),
        };

        if !db.create_user(&user)? {
            return Err(AuthError::UsernameTaken);
        }

        tracing::info!(username = %user.username, "Registered user");
        Ok(user)
    }

    /// Check a username/password pair and return the caller's identity.
    pub fn authenticate(
        &self,
        db: &Database,
        username: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        // Stored usernames are trimmed at registration
        let username = username.trim();
        let user = db.get_user(username)?;

        let stored_hash = user
            .as_ref()
            .map_or(self.dummy_hash.as_str(), |u| u.password_hash.as_str());
        let verified = self.verify_password(password, stored_hash);

        match user {
            Some(user) if verified => Ok(Identity {
                role: user.role,
                username: user.username,
            }),
            Some(_) => {
                tracing::debug!(username = %username, "Login rejected: password mismatch");
                Err(AuthError::AuthFailed)
            }
            None => {
                tracing::debug!(username = %username, "Login rejected: unknown user");
                Err(AuthError::AuthFailed)
            }
        }
    }

    /// Constant-time password check; a malformed stored hash never verifies.
    fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is malformed");
                false
            }
        }
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

fn validate_registration(username: &str, password: &str) -> Result<(), AuthError> {
    if username.is_empty() {
        return Err(AuthError::ValidationFailed(
            "username is required".to_string(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(AuthError::ValidationFailed(format!(
            "username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::ValidationFailed(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{setup_db, test_authenticator};

    #[test]
    fn test_register_then_authenticate() {
        let (db, _temp) = setup_db();
        let auth = test_authenticator();

        let user = auth.register(&db, "alice", "correct horse").unwrap();
        assert_eq!(user.role, DEFAULT_ROLE);
        assert_ne!(user.password_hash, "correct horse");

        let identity = auth.authenticate(&db, "alice", "correct horse").unwrap();
        assert_eq!(
            identity,
            Identity {
                role: DEFAULT_ROLE.to_string(),
                username: "alice".to_string(),
            }
        );
    }

    #[test]
    fn test_wrong_password_and_unknown_user_fail_identically() {
        let (db, _temp) = setup_db();
        let auth = test_authenticator();
        auth.register(&db, "alice", "correct horse").unwrap();

        let wrong_password = auth.authenticate(&db, "alice", "battery staple").unwrap_err();
        let unknown_user = auth.authenticate(&db, "mallory", "correct horse").unwrap_err();

        assert!(matches!(wrong_password, AuthError::AuthFailed));
        assert!(matches!(unknown_user, AuthError::AuthFailed));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let (db, _temp) = setup_db();
        let auth = test_authenticator();

        auth.register(&db, "alice", "correct horse").unwrap();
        assert!(matches!(
            auth.register(&db, "alice", "another password"),
            Err(AuthError::UsernameTaken)
        ));
        // Original password still works
        assert!(auth.authenticate(&db, "alice", "correct horse").is_ok());
    }

    #[test]
    fn test_registration_validation() {
        let (db, _temp) = setup_db();
        let auth = test_authenticator();

        assert!(matches!(
            auth.register(&db, "   ", "correct horse"),
            Err(AuthError::ValidationFailed(_))
        ));
        assert!(matches!(
            auth.register(&db, "alice", "short"),
            Err(AuthError::ValidationFailed(_))
        ));
        assert!(matches!(
            auth.register(&db, &"x".repeat(65), "correct horse"),
            Err(AuthError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_username_trimmed_on_register() {
        let (db, _temp) = setup_db();
        let auth = test_authenticator();

        auth.register(&db, "  alice  ", "correct horse").unwrap();
        assert!(auth.authenticate(&db, "alice", "correct horse").is_ok());
        assert!(auth.authenticate(&db, "  alice  ", "correct horse").is_ok());
        assert!(auth.authenticate(&db, "alice\t", "correct horse").is_ok());
    }

    #[test]
    fn test_hashes_are_salted() {
        let auth = test_authenticator();
        let first = auth.hash_password("same password").unwrap();
        let second = auth.hash_password("same password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_stored_hash_never_verifies() {
        let (db, _temp) = setup_db();
        let auth = test_authenticator();

        db.create_user(&User {
            password_hash: "not-a-phc-string".to_string(),
            role: DEFAULT_ROLE.to_string(),
            username: "broken".to_string(),
        })
        .unwrap();

        assert!(matches!(
            auth.authenticate(&db, "broken", "not-a-phc-string"),
            Err(AuthError::AuthFailed)
        ));
    }
}
