//! PrintNet Dashboard Library
//!
//! Backend client, page-scoped views and the local session proxy for the
//! PrintNet printer dashboard.

pub mod app;
pub mod authn;
pub mod commands;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod server;
pub mod storage;
pub mod utils;
pub mod views;
