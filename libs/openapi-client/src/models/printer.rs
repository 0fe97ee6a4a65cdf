//! Printer models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::models::text_field;

/// How the backend reaches a printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterfaceKind {
    /// Direct LAN connection
    #[serde(rename = "LAN")]
    Lan,
    /// Through an OctoPrint bridge
    #[serde(rename = "OCTOPRINT")]
    OctoPrint,
    /// Test variant that always fails
    #[serde(rename = "TROUBLES")]
    Troubles,
}

impl InterfaceKind {
    pub const ALL: [InterfaceKind; 3] = [Self::Lan, Self::OctoPrint, Self::Troubles];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lan => "LAN",
            Self::OctoPrint => "OCTOPRINT",
            Self::Troubles => "TROUBLES",
        }
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InterfaceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LAN" => Ok(Self::Lan),
            "OCTOPRINT" => Ok(Self::OctoPrint),
            "TROUBLES" => Ok(Self::Troubles),
            _ => Err(format!(
                "Invalid interface: {} (expected one of {})",
                s,
                Self::ALL.map(|kind| kind.as_str()).join(", ")
            )),
        }
    }
}

/// Printer status
///
/// The backend is the source of truth and may report values outside the
/// known set (the connection test answers `ONLINE`, for instance). Those
/// are kept verbatim in `Other` instead of failing the decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrinterStatus {
    Idle,
    Ready,
    Printing,
    Error,
    Offline,
    Disconnected,
    Other(String),
}

impl PrinterStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Idle => "IDLE",
            Self::Ready => "READY",
            Self::Printing => "PRINTING",
            Self::Error => "ERROR",
            Self::Offline => "OFFLINE",
            Self::Disconnected => "DISCONNECTED",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for PrinterStatus {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "IDLE" => Self::Idle,
            "READY" => Self::Ready,
            "PRINTING" => Self::Printing,
            "ERROR" => Self::Error,
            "OFFLINE" => Self::Offline,
            "DISCONNECTED" => Self::Disconnected,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl fmt::Display for PrinterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PrinterStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PrinterStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(PrinterStatus::from(s.as_str()))
    }
}

/// A printer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Printer {
    pub id: String,
    pub name: String,
    pub model: String,
    pub interface: Option<InterfaceKind>,
    pub status: Option<PrinterStatus>,
    pub is_active: bool,
    pub current_job_id: Option<String>,
    pub queue_id: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Printer {
    /// Normalize one printer object.
    ///
    /// Returns `None` when the value carries neither `id` nor `_id`.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let id = text_field(value, &["id", "_id"])?;
        let name = text_field(value, &["name", "displayName"])
            .unwrap_or_else(|| format!("Printer {}", id));
        let model = text_field(value, &["model"]).unwrap_or_else(|| "Unknown".to_string());

        Some(Self {
            name,
            model,
            interface: value
                .get("interface")
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok()),
            status: value
                .get("status")
                .and_then(Value::as_str)
                .map(PrinterStatus::from),
            is_active: value.get("is_active").and_then(Value::as_bool).unwrap_or(false),
            current_job_id: text_field(value, &["current_job_id"]),
            queue_id: text_field(value, &["queue_id"]),
            last_updated: value
                .get("last_updated")
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            id,
        })
    }

    /// Status text shown on badges; `"Unknown"` when the backend sent none
    pub fn status_label(&self) -> &str {
        self.status.as_ref().map(PrinterStatus::as_str).unwrap_or("Unknown")
    }
}

/// `GET /printers` reply shapes
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PrinterListResponse {
    Bare(Vec<Value>),
    Wrapped { printers: Vec<Value> },
    Unrecognised(Value),
}

impl PrinterListResponse {
    pub fn decode(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or(Self::Unrecognised(Value::Null))
    }

    /// Normalized printers; unrecognised shapes yield an empty list
    pub fn into_printers(self) -> Vec<Printer> {
        match self {
            Self::Bare(items) | Self::Wrapped { printers: items } => {
                items.iter().filter_map(Printer::from_value).collect()
            }
            Self::Unrecognised(_) => Vec::new(),
        }
    }
}

/// `GET /printers/{id}` reply shapes
#[derive(Debug, Clone, PartialEq)]
pub enum PrinterDetailResponse {
    Bare(Printer),
    Wrapped(Printer),
    FirstOfList(Printer),
    Missing,
}

impl PrinterDetailResponse {
    pub fn decode(value: &Value) -> Self {
        if let Some(printer) = Printer::from_value(value) {
            return Self::Bare(printer);
        }
        match value {
            Value::Array(items) => match items.first().and_then(Printer::from_value) {
                Some(printer) => Self::FirstOfList(printer),
                None => Self::Missing,
            },
            Value::Object(map) => match map.get("printer").and_then(Printer::from_value) {
                Some(printer) => Self::Wrapped(printer),
                None => Self::Missing,
            },
            _ => Self::Missing,
        }
    }

    pub fn into_printer(self) -> Option<Printer> {
        match self {
            Self::Bare(p) | Self::Wrapped(p) | Self::FirstOfList(p) => Some(p),
            Self::Missing => None,
        }
    }
}

/// `POST /printers` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePrinterRequest {
    pub name: String,
    pub model: String,
    pub interface: InterfaceKind,
}

/// `PUT /printers/{id}/status` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: PrinterStatus,
}

/// `POST /printers/{id}/test-connection` reply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestConnectionResponse {
    #[serde(default)]
    pub status: Option<PrinterStatus>,
    #[serde(default)]
    pub message: Option<String>,
}
