#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use openapi_client::{
    CreatePrinterRequest, Job, LoginRequest, NewJobRequest, Printer, PrinterStatus,
    RegisterRequest, TestConnectionResponse, UploadSignRequest, UploadSignResponse,
};
use printnet::authn::session::SessionToken;
use printnet::errors::DashboardError;
use printnet::http::api::{AuthApi, PrinterApi};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::sync::Notify;

pub const PRINTER_ID: &str = "11111111-1111-1111-1111-111111111111";

/// In-memory backend recording every call it receives
#[derive(Default)]
pub struct FakeBackend {
    pub printers: Mutex<Vec<Printer>>,
    pub printer: Mutex<Option<Printer>>,
    pub jobs: Mutex<Vec<Job>>,
    pub created_reply: Mutex<Value>,
    pub test_replies: Mutex<HashMap<String, TestConnectionResponse>>,
    pub sign_reply: Mutex<UploadSignResponse>,
    pub me_reply: Mutex<Value>,
    pub login_token: Mutex<Option<String>>,

    /// Operation name -> (status, backend error text)
    pub failures: Mutex<HashMap<&'static str, (u16, Option<String>)>>,
    /// When set, `test_connection` waits for a permit before answering
    pub test_gate: Mutex<Option<Arc<Notify>>>,

    pub calls: Mutex<Vec<String>>,
    pub status_updates: Mutex<Vec<(String, PrinterStatus)>>,
    pub sign_requests: Mutex<Vec<UploadSignRequest>>,
    pub uploads: Mutex<Vec<(String, String, usize)>>,
    pub added_jobs: Mutex<Vec<(String, Value)>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail(&self, operation: &'static str, status: u16, detail: Option<&str>) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation, (status, detail.map(String::from)));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, detail: &str) -> Result<(), DashboardError> {
        self.calls.lock().unwrap().push(format!("{} {}", operation, detail).trim().to_string());
        match self.failures.lock().unwrap().get(operation) {
            Some((status, detail)) => {
                let status = StatusCode::from_u16(*status).unwrap();
                Err(DashboardError::Backend {
                    status,
                    message: status.to_string(),
                    detail: detail.clone(),
                })
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PrinterApi for FakeBackend {
    async fn list_printers(&self) -> Result<Vec<Printer>, DashboardError> {
        self.record("list_printers", "")?;
        Ok(self.printers.lock().unwrap().clone())
    }

    async fn create_printer(&self, request: &CreatePrinterRequest) -> Result<Value, DashboardError> {
        self.record("create_printer", &request.name)?;
        Ok(self.created_reply.lock().unwrap().clone())
    }

    async fn get_printer(&self, printer_id: &str) -> Result<Option<Printer>, DashboardError> {
        self.record("get_printer", printer_id)?;
        Ok(self.printer.lock().unwrap().clone())
    }

    async fn update_printer_status(
        &self,
        printer_id: &str,
        status: &PrinterStatus,
    ) -> Result<(), DashboardError> {
        self.record("update_printer_status", printer_id)?;
        self.status_updates
            .lock()
            .unwrap()
            .push((printer_id.to_string(), status.clone()));
        Ok(())
    }

    async fn test_connection(
        &self,
        printer_id: &str,
    ) -> Result<TestConnectionResponse, DashboardError> {
        let gate = self.test_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.record("test_connection", printer_id)?;
        Ok(self
            .test_replies
            .lock()
            .unwrap()
            .get(printer_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_queue(&self, printer_id: &str) -> Result<Vec<Job>, DashboardError> {
        self.record("list_queue", printer_id)?;
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn add_job(
        &self,
        printer_id: &str,
        request: &NewJobRequest,
    ) -> Result<Value, DashboardError> {
        self.record("add_job", printer_id)?;
        self.added_jobs
            .lock()
            .unwrap()
            .push((printer_id.to_string(), serde_json::to_value(request).unwrap()));
        Ok(json!({ "id": "job-1" }))
    }

    async fn sign_upload(
        &self,
        request: &UploadSignRequest,
    ) -> Result<UploadSignResponse, DashboardError> {
        self.record("sign_upload", &request.filename)?;
        self.sign_requests.lock().unwrap().push(request.clone());
        Ok(self.sign_reply.lock().unwrap().clone())
    }

    async fn upload_signed(
        &self,
        url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), DashboardError> {
        self.record("upload_signed", url)?;
        self.uploads
            .lock()
            .unwrap()
            .push((url.to_string(), content_type.to_string(), bytes.len()));
        Ok(())
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn me(&self, _session: &SessionToken) -> Result<Value, DashboardError> {
        self.record("me", "")?;
        Ok(self.me_reply.lock().unwrap().clone())
    }

    async fn login(&self, request: &LoginRequest) -> Result<Option<SessionToken>, DashboardError> {
        self.record("login", &request.email)?;
        Ok(self.login_token.lock().unwrap().clone().map(SessionToken::new))
    }

    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<Option<SessionToken>, DashboardError> {
        self.record("register", &request.email)?;
        Ok(self.login_token.lock().unwrap().clone().map(SessionToken::new))
    }

    async fn logout(&self, _session: &SessionToken) -> Result<(), DashboardError> {
        self.record("logout", "")
    }
}

pub fn printer(id: &str, name: &str, status: Option<&str>) -> Printer {
    let mut value = json!({ "id": id, "name": name, "model": "MK4" });
    if let Some(status) = status {
        value["status"] = json!(status);
    }
    Printer::from_value(&value).unwrap()
}
