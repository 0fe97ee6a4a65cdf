//! Command-line front end
//!
//! Each command mounts one view against the real backend, runs its
//! operation once and prints the resulting state.

pub mod auth;
pub mod jobs;
pub mod printers;
pub mod render;

use std::collections::HashMap;
use std::sync::Arc;

use crate::app::options::AppOptions;
use crate::authn::session::SessionToken;
use crate::authn::store::SessionStore;
use crate::errors::DashboardError;
use crate::http::backend::Backend;
use crate::http::client::HttpClient;
use crate::views::navigation::RecordingNavigator;

/// Parsed `--key=value` flags; bare `--flag` maps to `"true"`
pub type CliArgs = HashMap<String, String>;

/// Everything a command needs
pub struct Context {
    pub options: AppOptions,
    pub http: Arc<HttpClient>,
    pub store: SessionStore,
    pub navigator: Arc<RecordingNavigator>,
}

impl Context {
    pub fn new(options: AppOptions) -> Result<Self, DashboardError> {
        let http = Arc::new(HttpClient::new(&options.backend_base_url)?);
        let store = SessionStore::new(options.layout.session_file());
        Ok(Self {
            options,
            http,
            store,
            navigator: Arc::new(RecordingNavigator::new()),
        })
    }

    pub async fn session(&self) -> Result<Option<SessionToken>, DashboardError> {
        self.store.load().await
    }

    /// Backend handle carrying the stored session cookie
    pub async fn backend(&self) -> Result<Arc<Backend>, DashboardError> {
        let session = self.session().await?;
        Ok(Arc::new(Backend::new(self.http.clone(), session)))
    }
}

/// Parse `--key=value` and `--flag` arguments
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> CliArgs {
    let mut cli_args = CliArgs::new();
    for arg in args {
        if let Some((key, value)) = arg.split_once('=') {
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }
    cli_args
}

/// A flag's value, ignoring bare flags
pub fn arg_value<'a>(args: &'a CliArgs, key: &str) -> Option<&'a str> {
    args.get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty() && *v != "true")
}

pub fn required_arg<'a>(args: &'a CliArgs, key: &str) -> Result<&'a str, DashboardError> {
    arg_value(args, key)
        .ok_or_else(|| DashboardError::ConfigError(format!("Missing --{}=<value>", key)))
}

/// Run whichever command the flags name
///
/// Returns `false` when no command flag was given.
pub async fn dispatch(ctx: &Context, args: &CliArgs) -> Result<bool, DashboardError> {
    if args.contains_key("login") {
        auth::login(ctx, args).await?;
    } else if args.contains_key("register") {
        auth::register(ctx, args).await?;
    } else if args.contains_key("logout") {
        auth::logout(ctx).await?;
    } else if args.contains_key("whoami") {
        auth::whoami(ctx).await?;
    } else if args.contains_key("add-printer") {
        printers::add_printer(ctx, args).await?;
    } else if args.contains_key("test-connection") {
        printers::test_connection(ctx, args).await?;
    } else if args.contains_key("printers") {
        printers::list(ctx).await?;
    } else if args.contains_key("new-job") {
        jobs::new_job(ctx, args).await?;
    } else if args.contains_key("start") {
        jobs::start(ctx, args).await?;
    } else if args.contains_key("printer") {
        jobs::show_printer(ctx, args).await?;
    } else {
        return Ok(false);
    }
    Ok(true)
}
