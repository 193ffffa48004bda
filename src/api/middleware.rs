//! Request identity middleware
//!
//! Resolves the caller behind an `Authorization: Bearer <token>` header and
//! attaches the resulting [`Identity`] to the request's extensions. Resolution
//! never fails a request: a missing, malformed, expired or orphaned token just
//! leaves the request unauthenticated, and handlers that need an identity
//! reject it themselves via [`RequireIdentity`].

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, HeaderValue, Method, Request},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::response::ApiError;
use crate::auth::Identity;
use crate::config::Config;
use crate::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Middleware that attaches the caller's identity, if any, to the request.
///
/// Requests whose path starts with one of the configured exempt prefixes
/// (login and registration by default) pass through untouched.
pub async fn resolve_identity(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if state.config.is_exempt_path(request.uri().path()) {
        return next.run(request).await;
    }

    if let Some(identity) = identify(&state, request.headers()) {
        request.extensions_mut().insert(identity);
    }

    next.run(request).await
}

/// Run the token -> subject -> user chain, giving up quietly at any failure.
fn identify(state: &AppState, headers: &HeaderMap) -> Option<Identity> {
    let token = bearer_token(headers)?;

    let username = match state.tokens.verify(token) {
        Ok(subject) => subject,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid bearer token");
            return None;
        }
    };

    match state.db.get_user(&username) {
        Ok(Some(user)) => Some(Identity {
            role: user.role,
            username: user.username,
        }),
        Ok(None) => {
            tracing::debug!(username = %username, "Bearer token subject no longer exists");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "User lookup failed during identity resolution");
            None
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
}

// ============================================================================
// Extractors
// ============================================================================

/// The request's identity, if one was resolved. Never rejects.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentIdentity(parts.extensions.get::<Identity>().cloned()))
    }
}

/// The request's identity; rejects with 401 when there is none.
#[derive(Debug, Clone)]
pub struct RequireIdentity(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for RequireIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(RequireIdentity)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

// ============================================================================
// CORS
// ============================================================================

/// CORS layer allowing the configured browser origin.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, axum::http::header::CONTENT_TYPE]);

    match config.server.cors_allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!(error = %e, "Invalid CORS origin, cross-origin requests disabled");
            cors
        }
    }
}
