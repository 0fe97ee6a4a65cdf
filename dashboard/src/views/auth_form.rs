//! Login and registration form

use std::sync::{Arc, Mutex};

use openapi_client::{LoginRequest, RegisterRequest};
use tracing::{info, warn};

use crate::authn::session::SessionToken;
use crate::errors::DashboardError;
use crate::http::api::AuthApi;
use crate::views::lock;
use crate::views::mount::Mounted;
use crate::views::navigation::{Navigator, Route};

const FALLBACK_ERROR: &str = "Something went wrong";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Default)]
pub struct AuthFormState {
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub submitting: bool,
    pub error: Option<String>,
}

pub struct AuthForm {
    mode: AuthMode,
    api: Arc<dyn AuthApi>,
    navigator: Arc<dyn Navigator>,
    mounted: Mounted,
    state: Mutex<AuthFormState>,
}

impl AuthForm {
    pub fn new(mode: AuthMode, api: Arc<dyn AuthApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            mode,
            api,
            navigator,
            mounted: Mounted::new(),
            state: Mutex::new(AuthFormState::default()),
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn unmount(&self) {
        self.mounted.unmount();
    }

    pub fn snapshot(&self) -> AuthFormState {
        lock(&self.state).clone()
    }

    pub fn set_email(&self, email: impl Into<String>) {
        lock(&self.state).email = email.into();
    }

    pub fn set_password(&self, password: impl Into<String>) {
        lock(&self.state).password = password.into();
    }

    pub fn set_nickname(&self, nickname: impl Into<String>) {
        lock(&self.state).nickname = nickname.into();
    }

    /// Submit the credentials
    ///
    /// Returns the session cookie the backend issued (it may set none, in
    /// which case the browser-side cookie jar is the only holder).
    pub async fn submit(&self) -> Result<Option<SessionToken>, DashboardError> {
        let (email, password, nickname) = {
            let mut state = lock(&self.state);
            state.submitting = true;
            state.error = None;
            (
                state.email.trim().to_string(),
                state.password.clone(),
                state.nickname.trim().to_string(),
            )
        };

        let result = match self.mode {
            AuthMode::Login => self.api.login(&LoginRequest { email, password }).await,
            AuthMode::Register => {
                let request = RegisterRequest {
                    email,
                    password,
                    nickname: (!nickname.is_empty()).then_some(nickname),
                };
                self.api.register(&request).await
            }
        };
        if !self.mounted.is_mounted() {
            return result;
        }

        let mut state = lock(&self.state);
        state.submitting = false;
        match &result {
            Ok(_) => {
                info!("{:?} succeeded", self.mode);
                state.password.clear();
                drop(state);
                self.navigator.push(Route::Dashboard);
            }
            Err(e) => {
                warn!("{:?} failed: {}", self.mode, e);
                state.error = Some(form_error(e));
            }
        }
        result
    }
}

fn form_error(e: &DashboardError) -> String {
    match e {
        DashboardError::Backend {
            detail: Some(detail),
            ..
        } => detail.clone(),
        _ => FALLBACK_ERROR.to_string(),
    }
}
