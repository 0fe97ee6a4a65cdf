//! Wire models for the dashboard's own HTTP endpoints.

pub mod models;

pub use models::*;
