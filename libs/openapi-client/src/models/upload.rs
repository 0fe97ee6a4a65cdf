//! Signed upload payloads

use serde::{Deserialize, Serialize};

/// `POST /upload/sign` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSignRequest {
    pub filename: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
}

/// `POST /upload/sign` reply
///
/// Without `url` there is nowhere to upload to. `model_id` is assigned by
/// the backend and is the only valid source of a job's model reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadSignResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default, rename = "modelId", alias = "model_id")]
    pub model_id: Option<String>,
}
