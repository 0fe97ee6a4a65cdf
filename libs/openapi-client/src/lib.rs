//! Wire models for the PrintNet backend API.
//!
//! The backend is loose about response shapes, so most record types are
//! decoded from `serde_json::Value` through tolerant constructors rather
//! than strict derives.

pub mod models;

pub use models::*;
