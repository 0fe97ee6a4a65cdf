//! Traits the views depend on
//!
//! `HttpClient` implements `AuthApi` and `Backend` implements `PrinterApi`;
//! tests swap in in-memory fakes.

use async_trait::async_trait;
use openapi_client::{
    CreatePrinterRequest, Job, LoginRequest, NewJobRequest, Printer, PrinterStatus,
    RegisterRequest, TestConnectionResponse, UploadSignRequest, UploadSignResponse,
};
use serde_json::Value;

use crate::authn::session::SessionToken;
use crate::errors::DashboardError;

/// Authentication endpoints
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Raw `GET /auth/me` payload for the given session
    async fn me(&self, session: &SessionToken) -> Result<Value, DashboardError>;

    /// Log in; returns the session cookie the backend set, if any
    async fn login(&self, request: &LoginRequest) -> Result<Option<SessionToken>, DashboardError>;

    /// Register; returns the session cookie the backend set, if any
    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<Option<SessionToken>, DashboardError>;

    async fn logout(&self, session: &SessionToken) -> Result<(), DashboardError>;
}

/// Printer, queue and upload endpoints, bound to one session
#[async_trait]
pub trait PrinterApi: Send + Sync {
    async fn list_printers(&self) -> Result<Vec<Printer>, DashboardError>;

    /// Raw creation reply; callers fill in whatever the backend left out
    async fn create_printer(&self, request: &CreatePrinterRequest)
        -> Result<Value, DashboardError>;

    async fn get_printer(&self, printer_id: &str) -> Result<Option<Printer>, DashboardError>;

    async fn update_printer_status(
        &self,
        printer_id: &str,
        status: &PrinterStatus,
    ) -> Result<(), DashboardError>;

    async fn test_connection(
        &self,
        printer_id: &str,
    ) -> Result<TestConnectionResponse, DashboardError>;

    async fn list_queue(&self, printer_id: &str) -> Result<Vec<Job>, DashboardError>;

    async fn add_job(
        &self,
        printer_id: &str,
        request: &NewJobRequest,
    ) -> Result<Value, DashboardError>;

    async fn sign_upload(
        &self,
        request: &UploadSignRequest,
    ) -> Result<UploadSignResponse, DashboardError>;

    /// Direct upload of the file body to a signed destination
    async fn upload_signed(
        &self,
        url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), DashboardError>;
}
