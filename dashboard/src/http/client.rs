//! HTTP client implementation

use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::authn::session::{token_from_set_cookie, SessionToken};
use crate::errors::DashboardError;

/// HTTP client for backend communication
///
/// Stateless apart from the connection pool: the session cookie is passed
/// per call so one client can serve many sessions (the `/api/me` proxy
/// forwards whatever cookie each request carries).
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client
    ///
    /// No request timeout is configured; the backend decides how long a
    /// call may take.
    pub fn new(base_url: &str) -> Result<Self, DashboardError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, session: Option<&SessionToken>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if let Some(session) = session {
            request = request.header(header::COOKIE, session.cookie_header());
        }
        request
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        session: Option<&SessionToken>,
    ) -> Result<T, DashboardError> {
        let response = self.request(Method::GET, path, session).send().await?;
        read_json(response, "GET").await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        session: Option<&SessionToken>,
        body: &B,
    ) -> Result<T, DashboardError> {
        let response = self
            .request(Method::POST, path, session)
            .json(body)
            .send()
            .await?;
        read_json(response, "POST").await
    }

    /// Make a POST request without a body
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        session: Option<&SessionToken>,
    ) -> Result<T, DashboardError> {
        let response = self.request(Method::POST, path, session).send().await?;
        read_json(response, "POST").await
    }

    /// Make a PUT request
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        session: Option<&SessionToken>,
        body: &B,
    ) -> Result<T, DashboardError> {
        let response = self
            .request(Method::PUT, path, session)
            .json(body)
            .send()
            .await?;
        read_json(response, "PUT").await
    }

    /// POST without a body, ignoring whatever the backend answers on success
    pub async fn post_discard(
        &self,
        path: &str,
        session: Option<&SessionToken>,
    ) -> Result<(), DashboardError> {
        let response = self.request(Method::POST, path, session).send().await?;
        check_status(response, "POST").await.map(|_| ())
    }

    /// PUT, ignoring whatever the backend answers on success
    pub async fn put_discard<B: Serialize>(
        &self,
        path: &str,
        session: Option<&SessionToken>,
        body: &B,
    ) -> Result<(), DashboardError> {
        let response = self
            .request(Method::PUT, path, session)
            .json(body)
            .send()
            .await?;
        check_status(response, "PUT").await.map(|_| ())
    }

    /// POST and pick the session cookie out of the reply's `Set-Cookie`
    /// headers. Used by login and registration.
    pub async fn post_for_session<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<SessionToken>, DashboardError> {
        let response = self.request(Method::POST, path, None).json(body).send().await?;
        let session = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(token_from_set_cookie);
        check_status(response, "POST").await?;
        Ok(session)
    }

    /// PUT raw bytes to an absolute, pre-signed storage URL.
    ///
    /// Carries no session cookie; the signed URL is its own credential.
    pub async fn put_bytes(
        &self,
        url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), DashboardError> {
        let url = url::Url::parse(url)?;
        debug!("PUT {} ({} bytes)", url.host_str().unwrap_or_default(), bytes.len());

        let response = self
            .client
            .put(url)
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Signed upload failed: {} - {}", status, body);
            return Err(DashboardError::Backend {
                status,
                message: format!("Upload failed: {}", status),
                detail: None,
            });
        }
        Ok(())
    }
}

/// Pass successful responses through; map anything else to a `Backend`
/// error carrying the backend's own error text when it sent one.
async fn check_status(response: Response, verb: &str) -> Result<Response, DashboardError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let bytes = response.bytes().await.unwrap_or_default();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    error!(
        "HTTP {} failed: {} - {}",
        verb,
        status,
        String::from_utf8_lossy(&bytes)
    );
    Err(DashboardError::Backend {
        status,
        message: status.to_string(),
        detail: openapi_client::error_message(&body),
    })
}

async fn read_json<T: DeserializeOwned>(
    response: Response,
    verb: &str,
) -> Result<T, DashboardError> {
    let bytes = check_status(response, verb).await?.bytes().await?;

    // 204s and empty 200s decode as JSON null
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(value),
        // Plain-text success bodies ("OK", "Created") read as null where
        // the caller accepts null
        Err(e) => serde_json::from_value(Value::Null).map_err(|_| {
            debug!("{} reply is not JSON: {}", verb, String::from_utf8_lossy(&bytes));
            e.into()
        }),
    }
}
