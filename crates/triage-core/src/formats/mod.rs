//! Format normalizers for bulk ingestion.
//!
//! Three independent adapters map raw CSV, JSON, and XML payloads into the
//! canonical pre-validation [`TicketDraft`] shape. Structural failures abort
//! the whole call with [`Error::MalformedInput`]; nothing here validates —
//! that is the validator's job.
//!
//! Selection is a tagged dispatch on [`ImportFormat`] in [`crate::ingest`];
//! the adapters share only the flat-record field resolution below.

pub mod csv;
pub mod json;
pub mod xml;

use std::collections::HashMap;

use crate::models::{MetadataDraft, TagsInput, TicketDraft};

/// Build a draft from a flat string-keyed record (CSV row, XML element).
///
/// Key resolution tries canonical snake_case first, then the camelCase
/// alias. Empty values are treated as absent. Nested metadata arrives under
/// dotted keys (`metadata.source`); repeated XML `<tag>` leaves arrive under
/// `tags.tag`.
pub(crate) fn draft_from_fields(mut fields: HashMap<String, String>) -> TicketDraft {
    let mut take = |keys: &[&str]| -> Option<String> {
        keys.iter()
            .find_map(|k| fields.remove(*k))
            .filter(|v| !v.trim().is_empty())
    };

    let tags = take(&["tags", "tags.tag"])
        .map(|raw| TagsInput::List(TagsInput::split_joined(&raw)));

    let meta_source = take(&["metadata.source"]);
    let meta_browser = take(&["metadata.browser"]);
    let meta_device = take(&["metadata.device_type"]);
    let metadata = if meta_source.is_some() || meta_browser.is_some() || meta_device.is_some() {
        Some(MetadataDraft {
            source: meta_source,
            browser: meta_browser,
            device_type: meta_device,
        })
    } else {
        None
    };

    let classification_confidence =
        take(&["classification_confidence"]).and_then(|raw| raw.parse().ok());

    TicketDraft {
        id: take(&["id"]),
        customer_id: take(&["customer_id", "customerId"]),
        customer_email: take(&["customer_email", "customerEmail"]),
        customer_name: take(&["customer_name", "customerName"]),
        subject: take(&["subject"]),
        description: take(&["description"]),
        category: take(&["category"]),
        priority: take(&["priority"]),
        status: take(&["status"]),
        created_at: take(&["created_at"]),
        updated_at: take(&["updated_at"]),
        resolved_at: take(&["resolved_at"]),
        assigned_to: take(&["assigned_to"]),
        tags,
        metadata,
        source: take(&["source"]),
        browser: take(&["browser"]),
        device_type: take(&["device_type"]),
        classification_confidence,
    }
}
