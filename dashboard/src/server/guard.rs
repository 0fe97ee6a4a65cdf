//! Request gating
//!
//! When enabled, requests for non-public paths that carry no session
//! cookie are redirected. The cookie is only checked for presence; the
//! backend remains the judge of whether it is valid.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::authn::session::token_from_cookie_header;
use crate::server::state::ServerState;

/// Route guard policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteGuardOptions {
    #[serde(default)]
    pub enabled: bool,

    /// Paths that pass without a session. An entry ending in `*` matches
    /// by prefix; anything else must match exactly.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,

    #[serde(default = "default_redirect_to")]
    pub redirect_to: String,
}

fn default_public_paths() -> Vec<String> {
    ["/", "/auth*", "/_next*", "/static*", "/favicon.ico", "/health", "/version"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_redirect_to() -> String {
    "/".to_string()
}

impl Default for RouteGuardOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            public_paths: default_public_paths(),
            redirect_to: default_redirect_to(),
        }
    }
}

impl RouteGuardOptions {
    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|public| match public.strip_suffix('*') {
            Some(prefix) => path.starts_with(prefix),
            None => path == public,
        })
    }

    /// Whether a request for `path` may proceed
    pub fn allows(&self, path: &str, has_session: bool) -> bool {
        !self.enabled || has_session || self.is_public(path)
    }
}

/// Middleware applying [`RouteGuardOptions`]
pub async fn route_guard(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let has_session = request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| token_from_cookie_header(v).is_some());

    if state.guard.allows(&path, has_session) {
        return next.run(request).await;
    }

    debug!("No session for {}, redirecting to {}", path, state.guard.redirect_to);
    Redirect::temporary(&state.guard.redirect_to).into_response()
}
