//! Session resolution and the CLI's cookie jar

pub mod session;
pub mod store;
