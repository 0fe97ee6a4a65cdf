//! Job queue API client

use openapi_client::{Job, JobQueueResponse, NewJobRequest};
use serde_json::Value;

use crate::authn::session::SessionToken;
use crate::errors::DashboardError;
use crate::http::client::HttpClient;
use crate::utils::encode_component;

impl HttpClient {
    /// List a printer's queue; anything but a bare array is an empty queue
    pub async fn list_queue(
        &self,
        session: Option<&SessionToken>,
        printer_id: &str,
    ) -> Result<Vec<Job>, DashboardError> {
        let path = format!("/printers/{}/queue/list", encode_component(printer_id));
        let value: Value = self.get(&path, session).await?;
        Ok(JobQueueResponse::decode(&value).into_jobs())
    }

    /// Add a job to a printer's queue
    pub async fn add_job(
        &self,
        session: Option<&SessionToken>,
        printer_id: &str,
        request: &NewJobRequest,
    ) -> Result<Value, DashboardError> {
        let path = format!("/printers/{}/queue/add", encode_component(printer_id));
        self.post(&path, session, request).await
    }
}
