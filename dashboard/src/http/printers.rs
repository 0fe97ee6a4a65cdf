//! Printer API client

use openapi_client::{
    CreatePrinterRequest, PrinterDetailResponse, PrinterListResponse, Printer, PrinterStatus,
    StatusUpdateRequest, TestConnectionResponse,
};
use serde_json::Value;

use crate::authn::session::SessionToken;
use crate::errors::DashboardError;
use crate::http::client::HttpClient;
use crate::utils::encode_component;

impl HttpClient {
    /// List printers, normalizing bare and wrapped reply shapes
    pub async fn list_printers(
        &self,
        session: Option<&SessionToken>,
    ) -> Result<Vec<Printer>, DashboardError> {
        let value: Value = self.get("/printers", session).await?;
        Ok(PrinterListResponse::decode(value).into_printers())
    }

    /// Create a printer
    pub async fn create_printer(
        &self,
        session: Option<&SessionToken>,
        request: &CreatePrinterRequest,
    ) -> Result<Value, DashboardError> {
        self.post("/printers", session, request).await
    }

    /// Fetch one printer; `None` when the reply holds no recognisable printer
    pub async fn get_printer(
        &self,
        session: Option<&SessionToken>,
        printer_id: &str,
    ) -> Result<Option<Printer>, DashboardError> {
        let path = format!("/printers/{}", encode_component(printer_id));
        let value: Value = self.get(&path, session).await?;
        Ok(PrinterDetailResponse::decode(&value).into_printer())
    }

    /// Update printer status
    pub async fn update_printer_status(
        &self,
        session: Option<&SessionToken>,
        printer_id: &str,
        status: &PrinterStatus,
    ) -> Result<(), DashboardError> {
        let path = format!("/printers/{}/status", encode_component(printer_id));
        let body = StatusUpdateRequest {
            status: status.clone(),
        };
        self.put_discard(&path, session, &body).await
    }

    /// Ask the backend to probe a printer
    pub async fn test_connection(
        &self,
        session: Option<&SessionToken>,
        printer_id: &str,
    ) -> Result<TestConnectionResponse, DashboardError> {
        let path = format!("/printers/{}/test-connection", encode_component(printer_id));
        let value: Value = self.post_empty(&path, session).await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }
}
