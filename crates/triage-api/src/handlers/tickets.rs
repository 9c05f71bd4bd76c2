//! Ticket HTTP handlers.
//!
//! Thin request/response mapping over the core pipeline: validation,
//! bulk import, classification, and the store CRUD surface.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use triage_core::{
    bulk_import, classify_ticket, validate_and_fill, Category, Error, ImportOutcome, Priority,
    Status, TagsInput, Ticket, TicketDraft, TicketFilter, TicketRepository,
};

use crate::{ApiError, AppState};

// =============================================================================
// CREATE
// =============================================================================

/// Query parameters for ticket creation.
#[derive(Debug, Deserialize)]
pub struct CreateTicketQuery {
    /// Run the classifier on the accepted ticket before storing it.
    pub auto_classify: Option<bool>,
}

/// Request body for ticket creation: the ticket payload itself plus an
/// optional `auto_classify` flag riding alongside it.
#[derive(Debug, Deserialize)]
pub struct CreateTicketBody {
    #[serde(default)]
    pub auto_classify: bool,
    #[serde(flatten)]
    pub ticket: TicketDraft,
}

/// Create a new support ticket.
///
/// # Returns
/// - 201 Created with the fully-populated ticket
/// - 400 Bad Request with every violated-field message
pub async fn create_ticket(
    State(state): State<AppState>,
    Query(query): Query<CreateTicketQuery>,
    Json(body): Json<CreateTicketBody>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    let auto_classify = query.auto_classify.unwrap_or(false) || body.auto_classify;

    let ticket = validate_and_fill(body.ticket)?;
    let ticket = if auto_classify {
        classify_ticket(&ticket, state.store.as_ref()).await?.updated
    } else {
        ticket
    };

    state.store.append(ticket.clone()).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

// =============================================================================
// BULK IMPORT
// =============================================================================

/// Request body for bulk import.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub format: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub auto_classify: bool,
}

/// Bulk import tickets from CSV, JSON, or XML content.
///
/// Structural failures (unsupported tag, malformed content) abort with 400;
/// per-record validation failures land in the returned summary while the
/// rest of the batch is stored.
///
/// # Returns
/// - 201 Created with `{ tickets, summary }`
/// - 400 Bad Request on structural failure
pub async fn import_tickets(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Result<(StatusCode, Json<ImportOutcome>), ApiError> {
    let (format, content) = match (req.format, req.content) {
        (Some(format), Some(content)) => (format, content),
        _ => {
            return Err(ApiError::bad_request(
                "Missing required fields: format, content",
            ))
        }
    };

    let outcome = bulk_import(&format, &content)?;

    let mut saved = Vec::with_capacity(outcome.tickets.len());
    for ticket in outcome.tickets {
        let ticket = if req.auto_classify {
            classify_ticket(&ticket, state.store.as_ref()).await?.updated
        } else {
            ticket
        };
        state.store.append(ticket.clone()).await?;
        saved.push(ticket);
    }

    Ok((
        StatusCode::CREATED,
        Json(ImportOutcome {
            tickets: saved,
            summary: outcome.summary,
        }),
    ))
}

// =============================================================================
// LIST / GET
// =============================================================================

/// Query parameters for listing tickets.
#[derive(Debug, Default, Deserialize)]
pub struct ListTicketsQuery {
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    /// Comma-separated; tickets must carry every requested tag.
    pub tags: Option<String>,
    /// Case-insensitive substring over subject + description.
    pub search: Option<String>,
}

impl ListTicketsQuery {
    fn into_filter(self) -> Result<TicketFilter, ApiError> {
        let category = self
            .category
            .map(|s| s.parse::<Category>())
            .transpose()
            .map_err(Error::InvalidInput)?;
        let priority = self
            .priority
            .map(|s| s.parse::<Priority>())
            .transpose()
            .map_err(Error::InvalidInput)?;
        let status = self
            .status
            .map(|s| s.parse::<Status>())
            .transpose()
            .map_err(Error::InvalidInput)?;
        let tags = self
            .tags
            .map(|raw| TagsInput::split_joined(&raw))
            .unwrap_or_default();

        Ok(TicketFilter {
            category,
            priority,
            status,
            tags,
            search: self.search,
        })
    }
}

/// List tickets with optional filtering.
pub async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<ListTicketsQuery>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let filter = query.into_filter()?;
    let tickets = state.store.list(filter).await?;
    Ok(Json(tickets))
}

/// Get a ticket by ID.
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ticket>, ApiError> {
    let ticket = state
        .store
        .find(id)
        .await?
        .ok_or(Error::TicketNotFound(id))?;
    Ok(Json(ticket))
}

// =============================================================================
// UPDATE / DELETE
// =============================================================================

/// Update a ticket: shallow-merge the body over the stored ticket, stamp
/// `updated_at`, and revalidate the merged result under the existing ID.
///
/// # Returns
/// - 200 OK with the stored ticket
/// - 400 Bad Request if the merged result violates the schema
/// - 404 Not Found for unknown IDs
pub async fn update_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Ticket>, ApiError> {
    let existing = state
        .store
        .find(id)
        .await?
        .ok_or(Error::TicketNotFound(id))?;

    let patch = match patch {
        serde_json::Value::Object(obj) => obj,
        _ => return Err(ApiError::bad_request("request body must be a JSON object")),
    };

    let mut merged = match serde_json::to_value(&existing)? {
        serde_json::Value::Object(obj) => obj,
        _ => return Err(ApiError::Internal("ticket did not serialize to an object".into())),
    };
    for (key, value) in patch {
        merged.insert(key, value);
    }
    merged.insert("id".to_string(), serde_json::to_value(existing.id)?);
    merged.insert("updated_at".to_string(), serde_json::to_value(Utc::now())?);

    let validated = validate_and_fill(TicketDraft::from_object(&merged))?;
    let updated = state
        .store
        .update(id, validated)
        .await?
        .ok_or(Error::TicketNotFound(id))?;
    Ok(Json(updated))
}

/// Delete a ticket.
pub async fn delete_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.store.remove(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::TicketNotFound(id).into())
    }
}

// =============================================================================
// CLASSIFY
// =============================================================================

/// Classification response: the decision plus the ticket it applies to.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ClassifyTicketResponse {
    pub id: Uuid,
    pub category: Category,
    pub priority: Priority,
    pub confidence: f64,
    pub reasoning: String,
    pub keywords_found: Vec<String>,
}

/// Classify a stored ticket and fold the decision back into the store.
pub async fn auto_classify_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClassifyTicketResponse>, ApiError> {
    let ticket = state
        .store
        .find(id)
        .await?
        .ok_or(Error::TicketNotFound(id))?;

    let classified = classify_ticket(&ticket, state.store.as_ref()).await?;
    state.store.update(id, classified.updated).await?;

    let decision = classified.decision;
    Ok(Json(ClassifyTicketResponse {
        id,
        category: decision.category,
        priority: decision.priority,
        confidence: decision.confidence,
        reasoning: decision.reasoning,
        keywords_found: decision.keywords_found,
    }))
}
