//! Profile page: who is logged in, and logout

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{info, warn};

use crate::authn::session::{resolve_session, SessionState, SessionToken};
use crate::errors::DashboardError;
use crate::http::api::AuthApi;
use crate::views::lock;
use crate::views::mount::Mounted;
use crate::views::navigation::{Navigator, Route};
use crate::views::notify::{Notification, Notifier};

pub struct ProfileView {
    api: Arc<dyn AuthApi>,
    session: Option<SessionToken>,
    navigator: Arc<dyn Navigator>,
    notifier: Notifier,
    mounted: Mounted,
    state: Mutex<Option<SessionState>>,
}

impl ProfileView {
    pub fn new(
        api: Arc<dyn AuthApi>,
        session: Option<SessionToken>,
        navigator: Arc<dyn Navigator>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            api,
            session,
            navigator,
            notifier: Notifier::new(notify_timeout),
            mounted: Mounted::new(),
            state: Mutex::new(None),
        }
    }

    pub fn unmount(&self) {
        self.mounted.unmount();
    }

    /// `None` until [`ProfileView::load`] has completed
    pub fn session_state(&self) -> Option<SessionState> {
        lock(&self.state).clone()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.notifier.current()
    }

    pub async fn load(&self) -> SessionState {
        let resolved = resolve_session(self.api.as_ref(), self.session.as_ref()).await;
        if self.mounted.is_mounted() {
            *lock(&self.state) = Some(resolved.clone());
        }
        resolved
    }

    /// End the session on the backend, then go to the login page
    pub async fn logout(&self) -> Result<(), DashboardError> {
        if let Some(session) = &self.session {
            if let Err(e) = self.api.logout(session).await {
                warn!("Logout failed: {}", e);
                if self.mounted.is_mounted() {
                    self.notifier.error(e.user_message());
                }
                return Err(e);
            }
            info!("Logged out");
        }
        if self.mounted.is_mounted() {
            *lock(&self.state) = Some(SessionState::Anonymous);
            self.navigator.push(Route::Login);
        }
        Ok(())
    }
}
