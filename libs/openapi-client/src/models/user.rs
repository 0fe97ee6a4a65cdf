//! Current user

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::text_field;

/// The signed-in user as reported by `GET /auth/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub nickname: String,
    #[serde(default)]
    pub role: String,
}

impl User {
    /// Decode a `/auth/me` payload, either bare or wrapped in `{ "user": ... }`.
    ///
    /// A payload without both an id and a nickname is treated as "no user".
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let inner = payload.get("user").unwrap_or(payload);
        if !inner.is_object() {
            return None;
        }
        let id = text_field(inner, &["id"])?;
        let nickname = text_field(inner, &["nickname"])?;
        let role = text_field(inner, &["role"]).unwrap_or_default();
        Some(Self { id, nickname, role })
    }

    /// Single upper-case initial used for the avatar badge
    pub fn initial(&self) -> char {
        self.nickname
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('U')
    }
}
