use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson, JSend};
use crate::auth::AuthError;
use crate::AppState;

/// The only message a failed login ever returns
const INVALID_CREDENTIALS: &str = "Invalid username or password";

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct CredentialsRequest {
    pub password: String,
    pub username: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterResponse {
    pub role: String,
    pub username: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginResponse {
    pub expires_at: String,
    pub role: String,
    pub token: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CredentialsRequest>,
) -> Result<Json<JSend<RegisterResponse>>, ApiError> {
    // Password hashing is CPU-bound; keep it off the async workers
    let worker = Arc::clone(&state);
    let user = tokio::task::spawn_blocking(move || {
        worker
            .authenticator
            .register(&worker.db, &req.username, &req.password)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Registration task failed: {e}")))?
    .map_err(|e| match e {
        AuthError::ValidationFailed(_) | AuthError::UsernameTaken => {
            ApiError::bad_request(format!("Registration failed: {e}"))
        }
        other => {
            tracing::error!(error = %other, "Registration failed");
            ApiError::internal("Registration failed")
        }
    })?;

    Ok(JSend::success(RegisterResponse {
        role: user.role,
        username: user.username,
    }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CredentialsRequest>,
) -> Result<Json<JSend<LoginResponse>>, ApiError> {
    let worker = Arc::clone(&state);
    let identity = tokio::task::spawn_blocking(move || {
        worker
            .authenticator
            .authenticate(&worker.db, &req.username, &req.password)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Login task failed: {e}")))?
    .map_err(|e| match e {
        AuthError::AuthFailed => ApiError::unauthorized(INVALID_CREDENTIALS),
        other => {
            tracing::error!(error = %other, "Login failed");
            ApiError::internal("Login failed")
        }
    })?;

    let issued = state.tokens.issue(&identity.username).map_err(|e| {
        tracing::error!(error = %e, "Failed to issue token");
        ApiError::internal("Failed to issue token")
    })?;

    tracing::info!(username = %identity.username, "User logged in");

    Ok(JSend::success(LoginResponse {
        expires_at: issued.expires_at.to_rfc3339(),
        role: identity.role,
        token: issued.token,
    }))
}
