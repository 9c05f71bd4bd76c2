//! # triage-store
//!
//! In-memory store for tickets and the classification log.
//!
//! The store is a plain process-local structure behind an async lock: no
//! durability, no cross-process sharing. It is passed into the pipeline by
//! handle, so test isolation is a constructor call — there is no global
//! state to reset.
//!
//! ## Example
//!
//! ```rust,ignore
//! use triage_store::MemoryStore;
//! use triage_core::{TicketFilter, TicketRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new();
//!     store.append(ticket).await?;
//!     let open = store.list(TicketFilter::default()).await?;
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use triage_core::{
    ClassificationLog, ClassificationLogEntry, Result, Ticket, TicketFilter, TicketRepository,
};

/// In-memory implementation of the ticket store and classification log.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    tickets: Vec<Ticket>,
    classification_log: Vec<ClassificationLogEntry>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Whether a ticket satisfies every criterion in the filter.
fn matches(filter: &TicketFilter, ticket: &Ticket) -> bool {
    if let Some(category) = filter.category {
        if ticket.category != category {
            return false;
        }
    }
    if let Some(priority) = filter.priority {
        if ticket.priority != priority {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if ticket.status != status {
            return false;
        }
    }
    if !filter.tags.is_empty()
        && !filter.tags.iter().all(|tag| ticket.tags.contains(tag))
    {
        return false;
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let haystack =
            format!("{} {}", ticket.subject, ticket.description).to_lowercase();
        if !haystack.contains(&needle) {
            return false;
        }
    }
    true
}

#[async_trait]
impl TicketRepository for MemoryStore {
    async fn append(&self, ticket: Ticket) -> Result<()> {
        let mut inner = self.inner.write().await;
        tracing::debug!(ticket_id = %ticket.id, "ticket stored");
        inner.tickets.push(ticket);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Ticket>> {
        let inner = self.inner.read().await;
        Ok(inner.tickets.iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self, filter: TicketFilter) -> Result<Vec<Ticket>> {
        let inner = self.inner.read().await;
        Ok(inner
            .tickets
            .iter()
            .filter(|t| matches(&filter, t))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, ticket: Ticket) -> Result<Option<Ticket>> {
        let mut inner = self.inner.write().await;
        match inner.tickets.iter_mut().find(|t| t.id == id) {
            Some(slot) => {
                *slot = ticket;
                Ok(Some(slot.clone()))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.tickets.len();
        inner.tickets.retain(|t| t.id != id);
        Ok(inner.tickets.len() < before)
    }
}

#[async_trait]
impl ClassificationLog for MemoryStore {
    async fn append_log(&self, entry: ClassificationLogEntry) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.classification_log.push(entry);
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<ClassificationLogEntry>> {
        let inner = self.inner.read().await;
        Ok(inner.classification_log.clone())
    }
}
