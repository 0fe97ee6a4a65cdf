//! Server state

use std::sync::Arc;

use crate::http::api::AuthApi;
use crate::server::guard::RouteGuardOptions;

/// Server state shared across handlers
pub struct ServerState {
    /// Backend the `/api/me` proxy forwards to
    pub auth_api: Arc<dyn AuthApi>,
    pub guard: RouteGuardOptions,
}

impl ServerState {
    pub fn new(auth_api: Arc<dyn AuthApi>, guard: RouteGuardOptions) -> Self {
        Self { auth_api, guard }
    }
}
