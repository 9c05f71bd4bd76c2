//! Core data models for the triage ticket pipeline.
//!
//! These types are shared across all triage crates and represent the
//! canonical ticket entity, the pre-validation draft shape produced by the
//! format normalizers, and the ephemeral classification/import values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Ticket category assigned manually or by the classifier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    AccountAccess,
    TechnicalIssue,
    BillingQuestion,
    FeatureRequest,
    BugReport,
    #[default]
    Other,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccountAccess => write!(f, "account_access"),
            Self::TechnicalIssue => write!(f, "technical_issue"),
            Self::BillingQuestion => write!(f, "billing_question"),
            Self::FeatureRequest => write!(f, "feature_request"),
            Self::BugReport => write!(f, "bug_report"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "account_access" => Ok(Self::AccountAccess),
            "technical_issue" => Ok(Self::TechnicalIssue),
            "billing_question" => Ok(Self::BillingQuestion),
            "feature_request" => Ok(Self::FeatureRequest),
            "bug_report" => Ok(Self::BugReport),
            "other" => Ok(Self::Other),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

/// Ticket priority assigned manually or by the classifier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Urgent => write!(f, "urgent"),
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "urgent" => Ok(Self::Urgent),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

/// Workflow status of a ticket.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    New,
    InProgress,
    WaitingCustomer,
    Resolved,
    Closed,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::InProgress => write!(f, "in_progress"),
            Self::WaitingCustomer => write!(f, "waiting_customer"),
            Self::Resolved => write!(f, "resolved"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "waiting_customer" => Ok(Self::WaitingCustomer),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

/// Channel a ticket arrived through.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    WebForm,
    Email,
    #[default]
    Api,
    Chat,
    Phone,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WebForm => write!(f, "web_form"),
            Self::Email => write!(f, "email"),
            Self::Api => write!(f, "api"),
            Self::Chat => write!(f, "chat"),
            Self::Phone => write!(f, "phone"),
        }
    }
}

impl std::str::FromStr for Source {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "web_form" => Ok(Self::WebForm),
            "email" => Ok(Self::Email),
            "api" => Ok(Self::Api),
            "chat" => Ok(Self::Chat),
            "phone" => Ok(Self::Phone),
            _ => Err(format!("Invalid source: {}", s)),
        }
    }
}

/// Device type reported by the submitting client.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    #[default]
    Desktop,
    Mobile,
    Tablet,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Desktop => write!(f, "desktop"),
            Self::Mobile => write!(f, "mobile"),
            Self::Tablet => write!(f, "tablet"),
        }
    }
}

impl std::str::FromStr for DeviceType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(Self::Desktop),
            "mobile" => Ok(Self::Mobile),
            "tablet" => Ok(Self::Tablet),
            _ => Err(format!("Invalid device type: {}", s)),
        }
    }
}

// =============================================================================
// TICKET
// =============================================================================

/// Submission metadata attached to every ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TicketMetadata {
    pub source: Source,
    #[serde(default)]
    pub browser: String,
    pub device_type: DeviceType,
}

/// Canonical support ticket.
///
/// Only the validator constructs these; every instance satisfies the schema
/// constraints (enum membership, subject/description length bounds, tags and
/// metadata always present).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Ticket {
    pub id: Uuid,
    pub customer_id: String,
    pub customer_email: String,
    pub customer_name: String,
    pub subject: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub tags: Vec<String>,
    pub metadata: TicketMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification_confidence: Option<f64>,
}

// =============================================================================
// PRE-VALIDATION DRAFT
// =============================================================================

/// Tags as they arrive from callers: either a proper list or a single
/// comma-separated string (CSV cells, XML text content).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Joined(String),
}

impl TagsInput {
    /// Split a comma-separated tag string, trimming each element and
    /// dropping empties.
    pub fn split_joined(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Resolve to a proper list, splitting joined strings.
    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::List(tags) => tags,
            Self::Joined(raw) => Self::split_joined(&raw),
        }
    }
}

/// Nested metadata as supplied by callers, before defaulting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataDraft {
    pub source: Option<String>,
    pub browser: Option<String>,
    pub device_type: Option<String>,
}

/// A loosely-typed ticket candidate: the shape normalizers produce and the
/// validator consumes. Any field may be absent; no defaulting or validation
/// has been applied yet.
///
/// Accepts camelCase aliases for the customer fields (canonical snake_case
/// wins when both are present) and legacy flattened `source`/`browser`/
/// `device_type` alongside the nested `metadata` object (nested wins).
#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketDraft {
    pub id: Option<String>,
    pub customer_id: Option<String>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub resolved_at: Option<String>,
    pub assigned_to: Option<String>,
    pub tags: Option<TagsInput>,
    pub metadata: Option<MetadataDraft>,
    pub source: Option<String>,
    pub browser: Option<String>,
    pub device_type: Option<String>,
    pub classification_confidence: Option<f64>,
}

impl TicketDraft {
    /// Build a draft from a parsed JSON object.
    ///
    /// Canonical snake_case keys win over camelCase aliases even when both
    /// are present in the same record.
    pub fn from_object(obj: &serde_json::Map<String, serde_json::Value>) -> Self {
        let field = |keys: &[&str]| -> Option<String> {
            keys.iter()
                .filter_map(|k| obj.get(*k))
                .find_map(value_to_text)
        };

        let tags = obj.get("tags").and_then(|v| match v {
            serde_json::Value::Array(items) => Some(TagsInput::List(
                items.iter().filter_map(value_to_text).collect(),
            )),
            serde_json::Value::String(raw) => Some(TagsInput::Joined(raw.clone())),
            _ => None,
        });

        let metadata = obj
            .get("metadata")
            .and_then(|v| v.as_object())
            .map(|m| MetadataDraft {
                source: m.get("source").and_then(value_to_text),
                browser: m.get("browser").and_then(value_to_text),
                device_type: m.get("device_type").and_then(value_to_text),
            });

        let classification_confidence =
            obj.get("classification_confidence").and_then(|v| {
                v.as_f64()
                    .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
            });

        TicketDraft {
            id: field(&["id"]),
            customer_id: field(&["customer_id", "customerId"]),
            customer_email: field(&["customer_email", "customerEmail"]),
            customer_name: field(&["customer_name", "customerName"]),
            subject: field(&["subject"]),
            description: field(&["description"]),
            category: field(&["category"]),
            priority: field(&["priority"]),
            status: field(&["status"]),
            created_at: field(&["created_at"]),
            updated_at: field(&["updated_at"]),
            resolved_at: field(&["resolved_at"]),
            assigned_to: field(&["assigned_to"]),
            tags,
            metadata,
            source: field(&["source"]),
            browser: field(&["browser"]),
            device_type: field(&["device_type"]),
            classification_confidence,
        }
    }
}

/// Scalar JSON value as text; objects, arrays, and nulls are not fields.
fn value_to_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for TicketDraft {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let obj = value
            .as_object()
            .ok_or_else(|| serde::de::Error::custom("expected a ticket object"))?;
        Ok(TicketDraft::from_object(obj))
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Outcome of one classifier invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ClassificationDecision {
    pub category: Category,
    pub priority: Priority,
    /// Evidence strength in [0, 1].
    pub confidence: f64,
    /// Human-readable report of the two hit counts.
    pub reasoning: String,
    /// Every keyword pattern that matched, across both rule lists,
    /// deduplicated in first-seen order.
    pub keywords_found: Vec<String>,
}

/// Append-only classification log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationLogEntry {
    pub ticket_id: Uuid,
    pub decision: ClassificationDecision,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// BULK IMPORT
// =============================================================================

/// Supported bulk-import formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    Csv,
    Json,
    Xml,
}

impl std::fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
            Self::Xml => write!(f, "xml"),
        }
    }
}

impl std::str::FromStr for ImportFormat {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            _ => Err(format!("Invalid import format: {}", s)),
        }
    }
}

/// One rejected record inside a bulk import.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ImportRecordError {
    /// Position in the normalized record sequence, 0-based.
    pub index: usize,
    pub message: String,
    pub details: Vec<String>,
}

/// Per-call bulk import accounting.
///
/// `total` always equals `successful + failed` and the number of normalized
/// records; `errors` follows normalized-record order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ImportSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub errors: Vec<ImportRecordError>,
}

/// Result of a bulk import: accepted tickets in normalized-record order,
/// plus the summary.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ImportOutcome {
    pub tickets: Vec<Ticket>,
    pub summary: ImportSummary,
}
