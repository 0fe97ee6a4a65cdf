//! Routes and navigation

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::utils::encode_component;
use crate::views::lock;
use crate::views::mount::Mounted;

/// Dashboard routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Profile,
    Dashboard,
    Printer(String),
    NewJob(String),
}

impl Route {
    /// URL path, with ids percent-encoded
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/auth/login".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Printer(id) => format!("/dashboard/printer/{}", encode_component(id)),
            Route::NewJob(id) => {
                format!("/dashboard/printer/{}/jobs/new", encode_component(id))
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where views send the user next
pub trait Navigator: Send + Sync {
    fn push(&self, route: Route);
}

/// Navigator that only records where it was sent
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Route> {
        lock(&self.history).clone()
    }

    pub fn last(&self) -> Option<Route> {
        lock(&self.history).last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: Route) {
        debug!("Navigate to {}", route);
        lock(&self.history).push(route);
    }
}

/// Navigate after `delay`, unless the page has been torn down by then
pub fn push_after(
    navigator: Arc<dyn Navigator>,
    mounted: Mounted,
    route: Route,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if mounted.is_mounted() {
            navigator.push(route);
        } else {
            debug!("Skipping navigation to {}, view unmounted", route);
        }
    })
}
