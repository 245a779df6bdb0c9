//! HTTP front end for Studiocast
//!
//! Exposes the publish and draft operations as JSON endpoints with
//! permissive CORS so a browser client on any origin can call them.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use libstudiocast::compose::{ComposeRequest, ComposedPost};
use libstudiocast::{PublishOutcome, PublishRequest, Publisher, StudiocastError};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    publisher: Arc<Publisher>,
}

impl AppState {
    pub fn new(publisher: Publisher) -> Self {
        Self {
            publisher: Arc::new(publisher),
        }
    }
}

/// JSON error body: `{"error": ..., "details": ...}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Handler error rendered with the status from [`StudiocastError::http_status`]
#[derive(Debug)]
pub struct ApiError(StudiocastError);

impl From<StudiocastError> for ApiError {
    fn from(err: StudiocastError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(StudiocastError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!(status = status.as_u16(), "Request failed: {}", self.0);
        }

        let message = self.0.to_string();
        let details = self.0.details();
        let body = ErrorBody {
            details: (details != message).then_some(details),
            error: message,
        };
        (status, Json(body)).into_response()
    }
}

/// Build the router with CORS and request tracing
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ]);

    Router::new()
        .route("/post-to-social", post(post_to_social))
        .route("/generate-social-content", post(generate_social_content))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the app on an already-bound listener until ctrl-c
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {}", addr);
    }
    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received shutdown signal, stopping gracefully...");
    } else {
        // No signal handler available; run until the task is dropped
        std::future::pending::<()>().await;
    }
}

async fn post_to_social(
    State(state): State<AppState>,
    payload: Result<Json<PublishRequest>, JsonRejection>,
) -> Result<Json<PublishOutcome>, ApiError> {
    let Json(request) = payload?;
    let outcome = state.publisher.publish(&request).await?;
    Ok(Json(outcome))
}

async fn generate_social_content(
    State(state): State<AppState>,
    payload: Result<Json<ComposeRequest>, JsonRejection>,
) -> Result<Json<ComposedPost>, ApiError> {
    let Json(request) = payload?;
    let composer = state.publisher.composer()?;
    let draft = composer.generate(&request).await?;
    Ok(Json(draft))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let platforms: Vec<&str> = state
        .publisher
        .configured_platforms()
        .iter()
        .map(|p| p.as_str())
        .collect();
    Json(serde_json::json!({"status": "ok", "platforms": platforms}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use libstudiocast::error::PlatformError;

    #[test]
    fn test_error_body_omits_redundant_details() {
        let body = ErrorBody {
            error: "Unsupported platform: mastodon".to_string(),
            details: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"error": "Unsupported platform: mastodon"})
        );
    }

    #[test]
    fn test_api_error_status_mapping() {
        let unsupported = ApiError::from(StudiocastError::UnsupportedPlatform("x2".into()));
        assert_eq!(unsupported.into_response().status(), StatusCode::BAD_REQUEST);

        let provider = ApiError::from(StudiocastError::Platform(PlatformError::Api {
            platform: "Twitter".to_string(),
            status: 503,
            body: "over capacity".to_string(),
        }));
        assert_eq!(provider.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
