//! On-disk cookie jar for the command-line front end
//!
//! Holds exactly the session cookie the backend issued, nothing more. A
//! browser keeps it in its cookie store; the CLI keeps it here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::authn::session::SessionToken;
use crate::errors::DashboardError;
use crate::filesys::file::File;

#[derive(Debug, Serialize, Deserialize)]
struct StoredCookie {
    value: String,
    saved_at: DateTime<Utc>,
}

/// Cookie jar file
pub struct SessionStore {
    file: File,
}

impl SessionStore {
    pub fn new(file: File) -> Self {
        Self { file }
    }

    /// Load the stored session, if any
    pub async fn load(&self) -> Result<Option<SessionToken>, DashboardError> {
        if !self.file.exists().await {
            debug!("No stored session at {:?}", self.file.path());
            return Ok(None);
        }
        let stored: StoredCookie = self.file.read_json().await?;
        Ok((!stored.value.is_empty()).then(|| SessionToken::new(stored.value)))
    }

    /// Persist a session cookie, readable by the owner only
    pub async fn save(&self, token: &SessionToken) -> Result<(), DashboardError> {
        let stored = StoredCookie {
            value: token.expose().to_string(),
            saved_at: Utc::now(),
        };
        self.file.write_json(&stored).await?;
        self.file.set_permissions_600().await?;
        info!("Session saved to {:?}", self.file.path());
        Ok(())
    }

    /// Forget the session
    pub async fn clear(&self) -> Result<(), DashboardError> {
        self.file.delete().await
    }
}
