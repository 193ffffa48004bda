//! Credential checks and the per-request identity they produce.

pub mod authenticator;

pub use authenticator::{AuthError, Authenticator, DEFAULT_ROLE};

/// The caller a request is acting for, resolved from a valid bearer token.
///
/// Lives only for the duration of one request, carried in the request's
/// extensions. Never stored in any global or shared location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub role: String,
    pub username: String,
}
