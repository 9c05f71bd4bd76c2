//! Schema validation with defaulting.
//!
//! [`validate_and_fill`] turns a loosely-typed [`TicketDraft`] into a
//! fully-populated [`Ticket`], or a [`Error::Validation`] listing every
//! violated field. Defaults are applied before validation; empty strings are
//! treated as absent so a blank CSV cell defaults the same way a missing
//! JSON key does.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::defaults::{
    DESCRIPTION_MAX_LEN, DESCRIPTION_MIN_LEN, SUBJECT_MAX_LEN, SUBJECT_MIN_LEN,
};
use crate::error::{Error, Result};
use crate::models::{TagsInput, Ticket, TicketDraft, TicketMetadata};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// Treat empty and whitespace-only strings as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Parse an ISO-8601 timestamp; date-only values resolve to midnight UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Validate a ticket candidate, filling defaults.
///
/// All constraints are checked; every violation is collected rather than
/// stopping at the first. On success the returned ticket has every field
/// resolved (only `resolved_at`/`assigned_to` may be null).
pub fn validate_and_fill(draft: TicketDraft) -> Result<Ticket> {
    let mut violations = Vec::new();
    let now = Utc::now();

    let id = match present(draft.id) {
        None => Uuid::new_v4(),
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            violations.push("\"id\" must be a valid UUID".to_string());
            Uuid::nil()
        }),
    };

    let customer_id = present(draft.customer_id).unwrap_or_else(|| {
        violations.push("\"customer_id\" is required".to_string());
        String::new()
    });

    let customer_email = match present(draft.customer_email) {
        None => {
            violations.push("\"customer_email\" is required".to_string());
            String::new()
        }
        Some(email) => {
            if !EMAIL_RE.is_match(&email) {
                violations.push("\"customer_email\" must be a valid email".to_string());
            }
            email
        }
    };

    let customer_name = present(draft.customer_name).unwrap_or_else(|| {
        violations.push("\"customer_name\" is required".to_string());
        String::new()
    });

    let subject = present(draft.subject).unwrap_or_else(|| {
        violations.push("\"subject\" is required".to_string());
        String::new()
    });
    if !subject.is_empty() && !(SUBJECT_MIN_LEN..=SUBJECT_MAX_LEN).contains(&subject.chars().count())
    {
        violations.push(format!(
            "\"subject\" length must be between {} and {} characters",
            SUBJECT_MIN_LEN, SUBJECT_MAX_LEN
        ));
    }

    let description = present(draft.description).unwrap_or_else(|| {
        violations.push("\"description\" is required".to_string());
        String::new()
    });
    if !description.is_empty()
        && !(DESCRIPTION_MIN_LEN..=DESCRIPTION_MAX_LEN).contains(&description.chars().count())
    {
        violations.push(format!(
            "\"description\" length must be between {} and {} characters",
            DESCRIPTION_MIN_LEN, DESCRIPTION_MAX_LEN
        ));
    }

    let category = parse_enum_or_default(
        present(draft.category),
        &mut violations,
        "\"category\" must be one of: account_access, technical_issue, billing_question, \
         feature_request, bug_report, other",
    );
    let priority = parse_enum_or_default(
        present(draft.priority),
        &mut violations,
        "\"priority\" must be one of: urgent, high, medium, low",
    );
    let status = parse_enum_or_default(
        present(draft.status),
        &mut violations,
        "\"status\" must be one of: new, in_progress, waiting_customer, resolved, closed",
    );

    let created_at = parse_timestamp_or(present(draft.created_at), now, &mut violations, "created_at");
    let updated_at = parse_timestamp_or(present(draft.updated_at), now, &mut violations, "updated_at");

    let resolved_at = match present(draft.resolved_at) {
        None => None,
        Some(raw) => match parse_timestamp(&raw) {
            Some(ts) => Some(ts),
            None => {
                violations.push("\"resolved_at\" must be an ISO-8601 timestamp".to_string());
                None
            }
        },
    };

    let assigned_to = present(draft.assigned_to);

    // Tags must arrive as a recognizable list; anything else resets to empty.
    // The normalizers split comma-joined strings before this point.
    let tags = match draft.tags {
        Some(TagsInput::List(tags)) => tags,
        _ => Vec::new(),
    };

    // Nested metadata wins over the legacy flattened fields.
    let meta = draft.metadata.unwrap_or_default();
    let source = parse_enum_or_default(
        present(meta.source).or(present(draft.source)),
        &mut violations,
        "\"metadata.source\" must be one of: web_form, email, api, chat, phone",
    );
    let browser = present(meta.browser)
        .or(present(draft.browser))
        .unwrap_or_default();
    let device_type = parse_enum_or_default(
        present(meta.device_type).or(present(draft.device_type)),
        &mut violations,
        "\"metadata.device_type\" must be one of: desktop, mobile, tablet",
    );

    let classification_confidence = match draft.classification_confidence {
        None => None,
        Some(c) => {
            if !(0.0..=1.0).contains(&c) {
                violations.push(
                    "\"classification_confidence\" must be between 0 and 1".to_string(),
                );
            }
            Some(c)
        }
    };

    if !violations.is_empty() {
        return Err(Error::Validation(violations));
    }

    Ok(Ticket {
        id,
        customer_id,
        customer_email,
        customer_name,
        subject,
        description,
        category,
        priority,
        status,
        created_at,
        updated_at,
        resolved_at,
        assigned_to,
        tags,
        metadata: TicketMetadata {
            source,
            browser,
            device_type,
        },
        classification_confidence,
    })
}

fn parse_enum_or_default<T>(
    raw: Option<String>,
    violations: &mut Vec<String>,
    message: &str,
) -> T
where
    T: Default + std::str::FromStr,
{
    match raw {
        None => T::default(),
        Some(s) => s.parse().unwrap_or_else(|_| {
            violations.push(message.to_string());
            T::default()
        }),
    }
}

fn parse_timestamp_or(
    raw: Option<String>,
    fallback: DateTime<Utc>,
    violations: &mut Vec<String>,
    field: &str,
) -> DateTime<Utc> {
    match raw {
        None => fallback,
        Some(s) => parse_timestamp(&s).unwrap_or_else(|| {
            violations.push(format!("\"{}\" must be an ISO-8601 timestamp", field));
            fallback
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, DeviceType, Priority, Source, Status};

    fn minimal_draft() -> TicketDraft {
        TicketDraft {
            customer_id: Some("cust-1".to_string()),
            customer_email: Some("ada@example.com".to_string()),
            customer_name: Some("Ada Lovelace".to_string()),
            subject: Some("Cannot log in".to_string()),
            description: Some("The login page rejects my password.".to_string()),
            ..TicketDraft::default()
        }
    }

    #[test]
    fn test_minimal_draft_fills_all_defaults() {
        let ticket = validate_and_fill(minimal_draft()).unwrap();
        assert_eq!(ticket.category, Category::Other);
        assert_eq!(ticket.priority, Priority::Medium);
        assert_eq!(ticket.status, Status::New);
        assert_eq!(ticket.metadata.source, Source::Api);
        assert_eq!(ticket.metadata.browser, "");
        assert_eq!(ticket.metadata.device_type, DeviceType::Desktop);
        assert!(ticket.tags.is_empty());
        assert!(ticket.resolved_at.is_none());
        assert!(ticket.assigned_to.is_none());
        assert!(ticket.classification_confidence.is_none());
        assert_eq!(ticket.created_at, ticket.updated_at);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = validate_and_fill(minimal_draft()).unwrap();
        let b = validate_and_fill(minimal_draft()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_provided_id_is_kept() {
        let mut draft = minimal_draft();
        draft.id = Some("8a2b8c1e-8f3e-4f7a-9b1d-111111111111".to_string());
        let ticket = validate_and_fill(draft).unwrap();
        assert_eq!(
            ticket.id.to_string(),
            "8a2b8c1e-8f3e-4f7a-9b1d-111111111111"
        );
    }

    #[test]
    fn test_all_violations_are_collected() {
        let draft = TicketDraft {
            subject: Some("hi".to_string()),
            description: Some("too short".to_string()),
            category: Some("spam".to_string()),
            ..TicketDraft::default()
        };
        let err = validate_and_fill(draft).unwrap_err();
        let details = err.details();
        // Missing customer fields, bad description length, bad category —
        // every violation reported, not just the first.
        assert!(details.iter().any(|d| d.contains("customer_id")));
        assert!(details.iter().any(|d| d.contains("customer_email")));
        assert!(details.iter().any(|d| d.contains("customer_name")));
        assert!(details.iter().any(|d| d.contains("description")));
        assert!(details.iter().any(|d| d.contains("category")));
        assert!(details.len() >= 5);
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut draft = minimal_draft();
        draft.customer_email = Some("not-an-email".to_string());
        let err = validate_and_fill(draft).unwrap_err();
        assert!(err
            .details()
            .iter()
            .any(|d| d.contains("customer_email")));
    }

    #[test]
    fn test_subject_over_200_chars_rejected() {
        let mut draft = minimal_draft();
        draft.subject = Some("x".repeat(201));
        assert!(validate_and_fill(draft).is_err());
    }

    #[test]
    fn test_description_bounds() {
        let mut draft = minimal_draft();
        draft.description = Some("x".repeat(2000));
        assert!(validate_and_fill(draft).is_ok());

        let mut draft = minimal_draft();
        draft.description = Some("x".repeat(2001));
        assert!(validate_and_fill(draft).is_err());
    }

    #[test]
    fn test_empty_category_defaults_instead_of_failing() {
        let mut draft = minimal_draft();
        draft.category = Some(String::new());
        let ticket = validate_and_fill(draft).unwrap();
        assert_eq!(ticket.category, Category::Other);
    }

    #[test]
    fn test_joined_tags_reset_to_empty_by_validator() {
        // Comma-splitting is the normalizers' job; the validator only
        // recognizes proper lists.
        let mut draft = minimal_draft();
        draft.tags = Some(TagsInput::Joined("a,b".to_string()));
        let ticket = validate_and_fill(draft).unwrap();
        assert!(ticket.tags.is_empty());
    }

    #[test]
    fn test_list_tags_preserved_in_order() {
        let mut draft = minimal_draft();
        draft.tags = Some(TagsInput::List(vec![
            "billing".to_string(),
            "vip".to_string(),
            "billing".to_string(),
        ]));
        let ticket = validate_and_fill(draft).unwrap();
        assert_eq!(ticket.tags, vec!["billing", "vip", "billing"]);
    }

    #[test]
    fn test_nested_metadata_wins_over_flattened() {
        let mut draft = minimal_draft();
        draft.metadata = Some(crate::models::MetadataDraft {
            source: Some("chat".to_string()),
            browser: None,
            device_type: None,
        });
        draft.source = Some("phone".to_string());
        draft.browser = Some("Firefox".to_string());
        draft.device_type = Some("tablet".to_string());
        let ticket = validate_and_fill(draft).unwrap();
        assert_eq!(ticket.metadata.source, Source::Chat);
        // Fields absent from the nested object fall back to the flat ones.
        assert_eq!(ticket.metadata.browser, "Firefox");
        assert_eq!(ticket.metadata.device_type, DeviceType::Tablet);
    }

    #[test]
    fn test_invalid_source_rejected() {
        let mut draft = minimal_draft();
        draft.source = Some("carrier_pigeon".to_string());
        let err = validate_and_fill(draft).unwrap_err();
        assert!(err.details().iter().any(|d| d.contains("metadata.source")));
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let mut draft = minimal_draft();
        draft.classification_confidence = Some(1.5);
        assert!(validate_and_fill(draft).is_err());

        let mut draft = minimal_draft();
        draft.classification_confidence = Some(1.0);
        assert!(validate_and_fill(draft).is_ok());
    }

    #[test]
    fn test_timestamps_parsed_and_kept() {
        let mut draft = minimal_draft();
        draft.created_at = Some("2024-03-01T12:00:00Z".to_string());
        draft.resolved_at = Some("2024-03-02".to_string());
        let ticket = validate_and_fill(draft).unwrap();
        assert_eq!(ticket.created_at.to_rfc3339(), "2024-03-01T12:00:00+00:00");
        assert!(ticket.resolved_at.is_some());
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let mut draft = minimal_draft();
        draft.created_at = Some("yesterday".to_string());
        let err = validate_and_fill(draft).unwrap_err();
        assert!(err.details().iter().any(|d| d.contains("created_at")));
    }
}
