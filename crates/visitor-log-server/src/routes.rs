//! Route table and request handlers.
//!
//! Handlers are stateless apart from [`AppState`], which carries the
//! shared store and echo client. Failures map to JSON error bodies:
//! 400 for caller input, 500 for storage or upstream failures.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use visitor_log_core::{VisitorName, VisitorSummary};
use visitor_log_store::VisitorStore;

use crate::echo::IpEcho;

/// Health check body.
pub const HEALTH_MESSAGE: &str = "Backend is running!";
/// Body of a successful `POST /visitors`.
pub const VISITOR_ADDED: &str = "Visitor added successfully";
/// Error for a missing or empty name.
pub const NAME_REQUIRED: &str = "Name is required";
/// Error for storage failures.
pub const INTERNAL_ERROR: &str = "Internal Server Error";
/// Message of a successful `GET /check-ip`.
pub const OUTBOUND_OK: &str = "Outbound call successful! This is the public IP of the server.";
/// Error for a failed outbound call.
pub const OUTBOUND_FAILED: &str = "Failed to make outbound call";

// ============================================================================
// State
// ============================================================================

/// Shared handler dependencies.
#[derive(Clone)]
pub struct AppState {
    /// Visitor persistence.
    pub store: Arc<dyn VisitorStore>,
    /// Outbound IP check.
    pub echo: Arc<dyn IpEcho>,
    /// Include error messages in 500 bodies.
    pub expose_error_details: bool,
}

impl AppState {
    /// State with error details hidden.
    pub fn new(store: Arc<dyn VisitorStore>, echo: Arc<dyn IpEcho>) -> Self {
        Self {
            store,
            echo,
            expose_error_details: false,
        }
    }

    /// Toggle error details in 500 bodies.
    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }

    fn internal(&self, error: &'static str, cause: &dyn std::fmt::Display) -> ApiError {
        ApiError::Internal {
            error,
            details: self.expose_error_details.then(|| cause.to_string()),
        }
    }
}

// ============================================================================
// Bodies
// ============================================================================

/// `{"message": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Confirmation text.
    pub message: String,
}

/// `{"message": ..., "ip": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIpBody {
    /// Confirmation text.
    pub message: String,
    /// Public IP as seen by the echo service.
    pub ip: String,
}

/// `{"error": ..., "details"?: ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error.
    pub error: String,
    /// Underlying cause, when enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A handler failure, rendered as a JSON error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 400: the request itself is unacceptable.
    BadRequest(String),
    /// 500: storage or an upstream dependency failed.
    Internal {
        /// Public error text.
        error: &'static str,
        /// Underlying cause, if exposed.
        details: Option<String>,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(error) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    details: None,
                },
            ),
            ApiError::Internal { error, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: error.to_string(),
                    details,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

/// The four routes, bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/visitors", get(list_visitors).post(add_visitor))
        .route("/check-ip", get(check_ip))
        .with_state(state)
}

/// [`router`] with CORS and request tracing applied.
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /`. Never touches storage.
async fn health() -> &'static str {
    HEALTH_MESSAGE
}

/// `GET /visitors`
async fn list_visitors(
    State(state): State<AppState>,
) -> Result<Json<Vec<VisitorSummary>>, ApiError> {
    let visitors = state.store.list().await.map_err(|e| {
        tracing::error!(error = %e, "Error fetching visitors");
        state.internal(INTERNAL_ERROR, &e)
    })?;
    Ok(Json(visitors.into_iter().map(VisitorSummary::from).collect()))
}

/// `POST /visitors`
async fn add_visitor(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageBody>), ApiError> {
    let name = extract_name(payload)?;

    let visitor = state.store.add(&name).await.map_err(|e| {
        tracing::error!(error = %e, "Error adding visitor");
        state.internal(INTERNAL_ERROR, &e)
    })?;
    tracing::info!(id = visitor.id, "Visitor added");

    Ok((
        StatusCode::CREATED,
        Json(MessageBody {
            message: VISITOR_ADDED.to_string(),
        }),
    ))
}

/// `GET /check-ip`
async fn check_ip(State(state): State<AppState>) -> Result<Json<CheckIpBody>, ApiError> {
    let ip = state.echo.public_ip().await.map_err(|e| {
        tracing::error!(error = %e, "Error checking IP");
        state.internal(OUTBOUND_FAILED, &e)
    })?;
    Ok(Json(CheckIpBody {
        message: OUTBOUND_OK.to_string(),
        ip,
    }))
}

/// Pull a valid name out of the request body.
///
/// A malformed or non-JSON body is treated like a body without a name.
fn extract_name(payload: Result<Json<Value>, JsonRejection>) -> Result<VisitorName, ApiError> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Unreadable visitor body");
            Value::Null
        }
    };

    let raw = body
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest(NAME_REQUIRED.to_string()))?;

    VisitorName::parse(raw).map_err(|e| {
        tracing::warn!(error = %e, "Rejected visitor name");
        match e {
            visitor_log_core::Error::Validation { message, .. } => ApiError::BadRequest(message),
            other => ApiError::BadRequest(other.to_string()),
        }
    })
}
