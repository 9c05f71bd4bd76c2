//! # triage-core
//!
//! Core types and pipeline logic for the triage ticket service: the
//! canonical ticket schema, validation with defaulting, the three bulk
//! import normalizers, and the keyword-rule classifier.
//!
//! The pipeline is synchronous, stateless computation over immutable rule
//! tables; the only mutable state — the ticket store and the classification
//! log — lives behind the traits in [`traits`] and is passed by handle.

pub mod classify;
pub mod defaults;
pub mod error;
pub mod formats;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod traits;
pub mod validate;

// Re-export commonly used types at crate root
pub use classify::{classify_ticket, evaluate, Classified};
pub use error::{Error, Result};
pub use ingest::{bulk_import, normalize_records};
pub use models::*;
pub use traits::{ClassificationLog, TicketFilter, TicketRepository};
pub use validate::validate_and_fill;
