//! Backend error bodies

use serde_json::Value;

/// Extract the human readable error text from a backend error body.
///
/// The backend uses `error`; some routes answer with `message` instead.
pub fn error_message(body: &Value) -> Option<String> {
    ["error", "message"].iter().find_map(|key| {
        body.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
