//! Error types for the PrintNet dashboard

use thiserror::Error;

use crate::views::job_form::FieldErrors;

/// Main error type for the dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    /// No session cookie, or the backend rejected it
    #[error("Unauthorized")]
    Unauthorized,

    /// Non-success status from the backend
    #[error("Backend error ({status}): {message}")]
    Backend {
        status: reqwest::StatusCode,
        message: String,
        /// Text from the backend's own `error`/`message` field, if it sent one
        detail: Option<String>,
    },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    /// Text shown to the user in a notification.
    ///
    /// The backend's own error field wins when present; otherwise the
    /// transport or status message is used.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Backend {
                detail: Some(detail),
                ..
            } => detail.clone(),
            DashboardError::Backend { message, .. } => message.clone(),
            DashboardError::HttpError(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    /// Whether the failure means the caller has no valid session
    pub fn is_unauthorized(&self) -> bool {
        match self {
            DashboardError::Unauthorized => true,
            DashboardError::Backend { status, .. } => {
                *status == reqwest::StatusCode::UNAUTHORIZED
            }
            _ => false,
        }
    }
}

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        DashboardError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_detail_wins_over_status_line() {
        let err = DashboardError::Backend {
            status: reqwest::StatusCode::CONFLICT,
            message: "409 Conflict".to_string(),
            detail: Some("Printer is busy".to_string()),
        };
        assert_eq!(err.user_message(), "Printer is busy");

        let err = DashboardError::Backend {
            status: reqwest::StatusCode::BAD_GATEWAY,
            message: "502 Bad Gateway".to_string(),
            detail: None,
        };
        assert_eq!(err.user_message(), "502 Bad Gateway");
    }

    #[test]
    fn unauthorized_detection() {
        assert!(DashboardError::Unauthorized.is_unauthorized());
        let err = DashboardError::Backend {
            status: reqwest::StatusCode::UNAUTHORIZED,
            message: "401 Unauthorized".to_string(),
            detail: None,
        };
        assert!(err.is_unauthorized());
        assert!(!DashboardError::NotFound("x".into()).is_unauthorized());
    }
}
