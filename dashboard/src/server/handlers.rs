//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use openapi_server::{ErrorBody, HealthResponse, VersionResponse};
use tracing::{debug, error, warn};

use crate::authn::session::token_from_cookie_header;
use crate::errors::DashboardError;
use crate::server::state::ServerState;
use crate::utils::version_info;

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "printnet".to_string(),
        version: version.version,
    })
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    let version = version_info();
    Json(VersionResponse {
        version: version.version,
        git_hash: version.git_hash,
        build_time: version.build_time,
    })
}

/// Current user, resolved by forwarding the caller's session cookie
///
/// The backend's payload is passed through as-is on success. A backend
/// rejection keeps its status code but the body is always the generic
/// unauthorized error.
pub async fn me_handler(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    let token = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(token_from_cookie_header);

    let Some(token) = token else {
        debug!("/api/me without session cookie");
        return (StatusCode::UNAUTHORIZED, Json(ErrorBody::unauthorized())).into_response();
    };

    match state.auth_api.me(&token).await {
        Ok(user) => Json(user).into_response(),
        Err(DashboardError::Backend { status, .. }) => {
            warn!("Backend rejected session: {}", status);
            (status, Json(ErrorBody::unauthorized())).into_response()
        }
        Err(DashboardError::Unauthorized) => {
            (StatusCode::UNAUTHORIZED, Json(ErrorBody::unauthorized())).into_response()
        }
        Err(e) => {
            error!("Error fetching user from backend: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::internal())).into_response()
        }
    }
}

/// Anything the dashboard does not serve itself
pub async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found")))
}
