//! Session-bound backend handle used by the views

use std::sync::Arc;

use async_trait::async_trait;
use openapi_client::{
    CreatePrinterRequest, Job, NewJobRequest, Printer, PrinterStatus, TestConnectionResponse,
    UploadSignRequest, UploadSignResponse,
};
use serde_json::Value;

use crate::authn::session::SessionToken;
use crate::errors::DashboardError;
use crate::http::api::PrinterApi;
use crate::http::client::HttpClient;

/// An `HttpClient` plus the session cookie every call forwards
pub struct Backend {
    http: Arc<HttpClient>,
    session: Option<SessionToken>,
}

impl Backend {
    pub fn new(http: Arc<HttpClient>, session: Option<SessionToken>) -> Self {
        Self { http, session }
    }

    pub fn session(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }
}

#[async_trait]
impl PrinterApi for Backend {
    async fn list_printers(&self) -> Result<Vec<Printer>, DashboardError> {
        self.http.list_printers(self.session()).await
    }

    async fn create_printer(
        &self,
        request: &CreatePrinterRequest,
    ) -> Result<Value, DashboardError> {
        self.http.create_printer(self.session(), request).await
    }

    async fn get_printer(&self, printer_id: &str) -> Result<Option<Printer>, DashboardError> {
        self.http.get_printer(self.session(), printer_id).await
    }

    async fn update_printer_status(
        &self,
        printer_id: &str,
        status: &PrinterStatus,
    ) -> Result<(), DashboardError> {
        self.http
            .update_printer_status(self.session(), printer_id, status)
            .await
    }

    async fn test_connection(
        &self,
        printer_id: &str,
    ) -> Result<TestConnectionResponse, DashboardError> {
        self.http.test_connection(self.session(), printer_id).await
    }

    async fn list_queue(&self, printer_id: &str) -> Result<Vec<Job>, DashboardError> {
        self.http.list_queue(self.session(), printer_id).await
    }

    async fn add_job(
        &self,
        printer_id: &str,
        request: &NewJobRequest,
    ) -> Result<Value, DashboardError> {
        self.http.add_job(self.session(), printer_id, request).await
    }

    async fn sign_upload(
        &self,
        request: &UploadSignRequest,
    ) -> Result<UploadSignResponse, DashboardError> {
        self.http.sign_upload(self.session(), request).await
    }

    async fn upload_signed(
        &self,
        url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), DashboardError> {
        self.http.put_bytes(url, content_type, bytes).await
    }
}
