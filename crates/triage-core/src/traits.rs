//! Store traits for the triage pipeline.
//!
//! The pipeline writes into an external store through these interfaces; the
//! store object is passed by handle so test isolation is a constructor call,
//! never a global reset.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Category, ClassificationLogEntry, Priority, Status, Ticket,
};

// =============================================================================
// LIST FILTERING
// =============================================================================

/// Criteria for listing tickets.
///
/// Enum fields match exactly; `tags` requires the ticket to carry every
/// requested tag; `search` is a case-insensitive substring match over
/// subject + description.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub tags: Vec<String>,
    pub search: Option<String>,
}

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

/// Repository for ticket CRUD operations.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Append a newly accepted ticket.
    async fn append(&self, ticket: Ticket) -> Result<()>;

    /// Fetch a ticket by ID.
    async fn find(&self, id: Uuid) -> Result<Option<Ticket>>;

    /// List tickets matching the filter, in insertion order.
    async fn list(&self, filter: TicketFilter) -> Result<Vec<Ticket>>;

    /// Replace a stored ticket. Returns the stored value, or `None` if the
    /// ID is unknown.
    async fn update(&self, id: Uuid, ticket: Ticket) -> Result<Option<Ticket>>;

    /// Remove a ticket. Returns whether anything was removed.
    async fn remove(&self, id: Uuid) -> Result<bool>;
}

/// Append-only log of classification decisions.
#[async_trait]
pub trait ClassificationLog: Send + Sync {
    /// Append one entry. Entries are never mutated or pruned.
    async fn append_log(&self, entry: ClassificationLogEntry) -> Result<()>;

    /// Snapshot of all entries, oldest first.
    async fn entries(&self) -> Result<Vec<ClassificationLogEntry>>;
}
