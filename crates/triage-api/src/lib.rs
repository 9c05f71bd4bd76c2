//! # triage-api
//!
//! HTTP layer for the triage ticket service. Maps request payloads onto the
//! core pipeline (validation, bulk import, classification) and pipeline
//! error kinds onto 4xx responses; every failure the pipeline can produce
//! originates from caller-supplied data, so nothing here maps to a 5xx
//! except genuinely internal faults.

pub mod handlers;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use triage_core::defaults::MAX_BODY_SIZE_BYTES;
use triage_store::MemoryStore;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful for
/// log correlation when a bulk import misbehaves.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Ticket store and classification log.
    pub store: Arc<MemoryStore>,
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router with all middleware layers applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/openapi.json", get(openapi_json))
        .route(
            "/tickets",
            get(handlers::tickets::list_tickets).post(handlers::tickets::create_ticket),
        )
        .route("/tickets/import", post(handlers::tickets::import_tickets))
        .route(
            "/tickets/:id",
            get(handlers::tickets::get_ticket)
                .put(handlers::tickets::update_ticket)
                .delete(handlers::tickets::delete_ticket),
        )
        .route(
            "/tickets/:id/auto-classify",
            post(handlers::tickets::auto_classify_ticket),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE_BYTES))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(PropagateRequestIdLayer::x_request_id())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// =============================================================================
// OPENAPI
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "triage-api",
        description = "Support ticket ingestion and classification API"
    ),
    components(schemas(
        triage_core::Ticket,
        triage_core::TicketMetadata,
        triage_core::Category,
        triage_core::Priority,
        triage_core::Status,
        triage_core::Source,
        triage_core::DeviceType,
        triage_core::ClassificationDecision,
        triage_core::ImportSummary,
        triage_core::ImportRecordError,
        triage_core::ImportOutcome,
    ))
)]
struct ApiDoc;

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

/// HTTP-facing error with status mapping.
#[derive(Debug)]
pub enum ApiError {
    BadRequest {
        message: String,
        details: Vec<String>,
    },
    NotFound(String),
    Internal(String),
}

impl ApiError {
    /// 400 with no detail list.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            details: Vec::new(),
        }
    }
}

impl From<triage_core::Error> for ApiError {
    fn from(err: triage_core::Error) -> Self {
        use triage_core::Error;
        match err {
            Error::Validation(details) => ApiError::BadRequest {
                message: "Validation failed".to_string(),
                details,
            },
            Error::MalformedInput { format, message } => ApiError::BadRequest {
                message: format!("Malformed {} input", format),
                details: vec![message],
            },
            err @ Error::UnsupportedFormat(_) => ApiError::BadRequest {
                message: err.to_string(),
                details: Vec::new(),
            },
            Error::InvalidInput(message) => ApiError::bad_request(message),
            err @ Error::TicketNotFound(_) => ApiError::NotFound(err.to_string()),
            err => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, details) = match self {
            ApiError::BadRequest { message, details } => {
                (StatusCode::BAD_REQUEST, message, details)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, Vec::new()),
        };

        let body = if details.is_empty() {
            serde_json::json!({ "error": message })
        } else {
            serde_json::json!({ "error": message, "details": details })
        };

        (status, Json(body)).into_response()
    }
}
