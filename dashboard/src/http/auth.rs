//! Authentication API client

use async_trait::async_trait;
use openapi_client::{LoginRequest, RegisterRequest};
use serde_json::Value;

use crate::authn::session::SessionToken;
use crate::errors::DashboardError;
use crate::http::api::AuthApi;
use crate::http::client::HttpClient;

#[async_trait]
impl AuthApi for HttpClient {
    async fn me(&self, session: &SessionToken) -> Result<Value, DashboardError> {
        self.get("/auth/me", Some(session)).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<Option<SessionToken>, DashboardError> {
        self.post_for_session("/auth/login", request).await
    }

    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<Option<SessionToken>, DashboardError> {
        self.post_for_session("/auth/register", request).await
    }

    async fn logout(&self, session: &SessionToken) -> Result<(), DashboardError> {
        self.post_discard("/auth/logout", Some(session)).await
    }
}
