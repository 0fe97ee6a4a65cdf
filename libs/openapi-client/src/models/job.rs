//! Print job models

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::text_field;

/// One step of a job's progress history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStep {
    pub name: String,
    pub state: Option<String>,
}

/// A queued print job
///
/// `status` is whatever the backend reports; no enumeration is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: Option<String>,
    pub model_id: Option<String>,
    pub filament_material: Option<String>,
    pub filament_color: Option<String>,
    pub scheduled_time: Option<String>,
    pub status: Option<String>,
    pub steps: Vec<JobStep>,
}

impl Job {
    /// Normalize the job at `index` of a queue listing.
    ///
    /// Jobs without `id`/`_id` are keyed by their position.
    pub fn from_value(index: usize, value: &Value) -> Self {
        let steps = ["steps", "status_history", "stages"]
            .iter()
            .find_map(|key| value.get(key).filter(|v| !v.is_null()))
            .and_then(Value::as_array)
            .map(|steps| {
                steps
                    .iter()
                    .enumerate()
                    .map(|(i, step)| JobStep {
                        name: text_field(step, &["name", "step"])
                            .unwrap_or_else(|| format!("Step {}", i + 1)),
                        state: text_field(step, &["state", "status"]),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: text_field(value, &["id", "_id"]).unwrap_or_else(|| index.to_string()),
            name: text_field(value, &["name"]),
            model_id: text_field(value, &["model_id", "modelId"]),
            filament_material: text_field(value, &["filament_material"]),
            filament_color: text_field(value, &["filament_color"]),
            scheduled_time: text_field(value, &["scheduled_time"]),
            status: text_field(value, &["status"]),
            steps,
        }
    }

    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or("Unknown")
    }

    /// Scheduled start, shown only while the job is waiting for it
    pub fn pending_schedule(&self) -> Option<&str> {
        match self.status.as_deref() {
            Some("SCHEDULED") => self.scheduled_time.as_deref(),
            _ => None,
        }
    }
}

/// `GET /printers/{id}/queue/list` reply
#[derive(Debug, Clone, PartialEq)]
pub enum JobQueueResponse {
    Jobs(Vec<Job>),
    Unrecognised,
}

impl JobQueueResponse {
    /// Only a bare array is a queue; anything else is an empty one.
    pub fn decode(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::Jobs(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| Job::from_value(i, item))
                    .collect(),
            ),
            _ => Self::Unrecognised,
        }
    }

    pub fn into_jobs(self) -> Vec<Job> {
        match self {
            Self::Jobs(jobs) => jobs,
            Self::Unrecognised => Vec::new(),
        }
    }
}

/// `POST /printers/{id}/queue/add` body
///
/// Absent optional fields are sent as explicit `null`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJobRequest {
    pub name: Option<String>,
    pub model_id: String,
    pub filament_material: Option<String>,
    pub filament_color: Option<String>,
    pub scheduled_time: Option<String>,
}
