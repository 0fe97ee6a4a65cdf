//! API models

pub mod auth;
pub mod error;
pub mod job;
pub mod printer;
pub mod upload;
pub mod user;

pub use auth::{LoginRequest, RegisterRequest};
pub use error::error_message;
pub use job::{Job, JobQueueResponse, JobStep, NewJobRequest};
pub use printer::{
    CreatePrinterRequest, InterfaceKind, Printer, PrinterDetailResponse, PrinterListResponse,
    PrinterStatus, StatusUpdateRequest, TestConnectionResponse,
};
pub use upload::{UploadSignRequest, UploadSignResponse};
pub use user::User;

use serde_json::Value;

/// Read the first usable identifier-like field from a JSON object.
///
/// Strings must be non-empty; numbers are rendered in decimal.
pub(crate) fn text_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
