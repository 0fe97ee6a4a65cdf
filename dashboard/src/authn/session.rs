//! Session cookie handling and current-user resolution

use std::fmt;

use openapi_client::User;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::errors::DashboardError;
use crate::http::api::AuthApi;

/// Name of the httpOnly cookie the backend issues on login
pub const SESSION_COOKIE: &str = "printnettoken";

/// The opaque session credential
///
/// Never printed; `Debug` is redacted.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::from(raw.into()))
    }

    /// `Cookie` header value forwarding this session
    pub fn cookie_header(&self) -> String {
        format!("{}={}", SESSION_COOKIE, self.0.expose_secret())
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

/// Find the session token in a raw `Cookie` request header
pub fn token_from_cookie_header(header: &str) -> Option<SessionToken> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name.trim() == SESSION_COOKIE && !value.trim().is_empty())
            .then(|| SessionToken::new(value.trim()))
    })
}

/// Find the session token in one `Set-Cookie` response header
pub fn token_from_set_cookie(header: &str) -> Option<SessionToken> {
    let first = header.split(';').next()?;
    let (name, value) = first.trim().split_once('=')?;
    (name.trim() == SESSION_COOKIE && !value.trim().is_empty())
        .then(|| SessionToken::new(value.trim()))
}

/// Outcome of resolving the current user once for a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No session cookie; render without user-specific parts
    Anonymous,
    Authenticated(User),
    /// The backend rejected the cookie
    Unauthorized,
    /// Transport failure or an unusable reply
    Failed(String),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Resolve the current user for a page load.
///
/// One backend call at most, never retried. A missing cookie short-circuits
/// to `Anonymous` without contacting the backend.
pub async fn resolve_session(api: &dyn AuthApi, token: Option<&SessionToken>) -> SessionState {
    let Some(token) = token else {
        debug!("No session cookie, resolving as anonymous");
        return SessionState::Anonymous;
    };

    match api.me(token).await {
        Ok(payload) => match User::from_payload(&payload) {
            Some(user) => SessionState::Authenticated(user),
            None => {
                warn!("Current user payload has no id/nickname");
                SessionState::Unauthorized
            }
        },
        // Any rejection by the backend counts as unauthorized
        Err(DashboardError::Unauthorized | DashboardError::Backend { .. }) => {
            SessionState::Unauthorized
        }
        Err(e) => {
            warn!("Failed to resolve current user: {}", e);
            SessionState::Failed(e.user_message())
        }
    }
}
