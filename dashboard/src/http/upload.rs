//! Signed upload API client

use openapi_client::{UploadSignRequest, UploadSignResponse};
use serde_json::Value;

use crate::authn::session::SessionToken;
use crate::errors::DashboardError;
use crate::http::client::HttpClient;

impl HttpClient {
    /// Request a signed upload destination
    ///
    /// A reply that is not an object reads as "no destination".
    pub async fn sign_upload(
        &self,
        session: Option<&SessionToken>,
        request: &UploadSignRequest,
    ) -> Result<UploadSignResponse, DashboardError> {
        let value: Value = self.post("/upload/sign", session, request).await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }
}
