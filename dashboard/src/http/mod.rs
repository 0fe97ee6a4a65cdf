//! Backend API client

pub mod api;
pub mod auth;
pub mod backend;
pub mod client;
pub mod printers;
pub mod queue;
pub mod upload;
