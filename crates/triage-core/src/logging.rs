//! Structured logging schema and field name constants for triage.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, rejected records, config choices |
//! | TRACE | Per-record iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across a request.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "ingest", "classify", "store"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "bulk_import", "validate", "classify"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Ticket UUID being operated on.
pub const TICKET_ID: &str = "ticket_id";

/// Bulk-import format tag ("csv", "json", "xml").
pub const IMPORT_FORMAT: &str = "format";

/// 0-based position of a record in the normalized sequence.
pub const RECORD_INDEX: &str = "index";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Count of normalized records in a bulk import.
pub const TOTAL: &str = "total";

/// Count of records that passed validation.
pub const SUCCESSFUL: &str = "successful";

/// Count of records rejected by validation.
pub const FAILED: &str = "failed";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
