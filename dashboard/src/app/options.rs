//! Application configuration options

use std::time::Duration;

use crate::server::guard::RouteGuardOptions;
use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;
use crate::views::job_form::JobFormOptions;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Backend API base URL
    pub backend_base_url: String,

    /// Storage layout paths
    pub layout: StorageLayout,

    /// Server configuration
    pub server: ServerOptions,

    /// Route gating for the local server
    pub route_guard: RouteGuardOptions,

    /// View timing
    pub views: ViewOptions,

    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:5000/api".to_string(),
            layout: StorageLayout::default(),
            server: ServerOptions::default(),
            route_guard: RouteGuardOptions::default(),
            views: ViewOptions::default(),
            max_shutdown_delay: Duration::from_secs(10),
        }
    }
}

impl AppOptions {
    pub fn from_settings(settings: &Settings, layout: StorageLayout) -> Self {
        Self {
            backend_base_url: settings.backend.base_url.clone(),
            layout,
            server: ServerOptions {
                host: settings.server.host.clone(),
                port: settings.server.port,
            },
            route_guard: settings.route_guard.clone(),
            views: ViewOptions {
                notify_timeout: Duration::from_millis(settings.notify_timeout_ms),
                navigate_delay: Duration::from_millis(settings.navigate_delay_ms),
            },
            ..Default::default()
        }
    }
}

/// Local HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Timing shared by the views
#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub notify_timeout: Duration,
    pub navigate_delay: Duration,
}

impl Default for ViewOptions {
    fn default() -> Self {
        let job_form = JobFormOptions::default();
        Self {
            notify_timeout: job_form.notify_timeout,
            navigate_delay: job_form.navigate_delay,
        }
    }
}

impl From<ViewOptions> for JobFormOptions {
    fn from(options: ViewOptions) -> Self {
        JobFormOptions {
            notify_timeout: options.notify_timeout,
            navigate_delay: options.navigate_delay,
        }
    }
}
