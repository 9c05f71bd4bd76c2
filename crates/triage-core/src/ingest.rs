//! Bulk import orchestration.
//!
//! Dispatches to the format normalizers, validates each normalized record
//! independently, and accounts for the outcome in an [`ImportSummary`].
//! Structural failures (unsupported tag, malformed input) abort the whole
//! call; per-record validation failures never do.

use crate::error::{Error, Result};
use crate::formats;
use crate::models::{
    ImportFormat, ImportOutcome, ImportRecordError, ImportSummary, TicketDraft,
};
use crate::validate::validate_and_fill;

/// Run the matching normalizer for the format.
pub fn normalize_records(format: ImportFormat, content: &str) -> Result<Vec<TicketDraft>> {
    match format {
        ImportFormat::Csv => formats::csv::normalize(content),
        ImportFormat::Json => formats::json::normalize(content),
        ImportFormat::Xml => formats::xml::normalize(content),
    }
}

/// Import a batch of tickets from raw content in the tagged format.
///
/// Returns the accepted tickets in normalized-record order together with
/// the summary; `summary.total == summary.successful + summary.failed`
/// always holds. A rejected record is isolated into `summary.errors` at its
/// normalized index and never aborts the batch.
pub fn bulk_import(format_tag: &str, content: &str) -> Result<ImportOutcome> {
    let format: ImportFormat = format_tag
        .parse()
        .map_err(|_| Error::UnsupportedFormat(format_tag.to_string()))?;

    let records = normalize_records(format, content)?;

    let mut summary = ImportSummary {
        total: records.len(),
        ..ImportSummary::default()
    };
    let mut tickets = Vec::new();

    for (index, draft) in records.into_iter().enumerate() {
        match validate_and_fill(draft) {
            Ok(ticket) => {
                summary.successful += 1;
                tickets.push(ticket);
            }
            Err(err) => {
                summary.failed += 1;
                tracing::debug!(index, error = %err, "import record rejected");
                summary.errors.push(ImportRecordError {
                    index,
                    message: "Validation failed".to_string(),
                    details: err.details(),
                });
            }
        }
    }

    tracing::info!(
        format = %format,
        total = summary.total,
        successful = summary.successful,
        failed = summary.failed,
        "bulk import complete"
    );

    Ok(ImportOutcome { tickets, summary })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_HEADER: &str = "customer_id,customer_email,customer_name,subject,description";

    fn csv_row(n: usize) -> String {
        format!(
            "c-{n},user{n}@example.com,User {n},Subject {n},A description long enough to pass."
        )
    }

    #[test]
    fn test_unsupported_format_aborts_before_parsing() {
        let err = bulk_import("yaml", "anything: at all").unwrap_err();
        match err {
            Error::UnsupportedFormat(tag) => assert_eq!(tag, "yaml"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_format_tag_is_case_insensitive() {
        let content = format!("{}\n{}", CSV_HEADER, csv_row(1));
        assert!(bulk_import("CSV", &content).is_ok());
    }

    #[test]
    fn test_summary_invariant_holds() {
        let content = format!(
            "{}\n{}\n{}\nbad,, , ,too short",
            CSV_HEADER,
            csv_row(1),
            csv_row(2)
        );
        let outcome = bulk_import("csv", &content).unwrap();
        assert_eq!(outcome.summary.total, 3);
        assert_eq!(
            outcome.summary.total,
            outcome.summary.successful + outcome.summary.failed
        );
        assert_eq!(outcome.summary.failed, 1);
    }

    #[test]
    fn test_per_record_isolation_preserves_survivor_order() {
        let content = format!(
            "{}\n{}\nbroken,,,,\n{}",
            CSV_HEADER,
            csv_row(1),
            csv_row(3)
        );
        let outcome = bulk_import("csv", &content).unwrap();
        assert_eq!(outcome.summary.successful, 2);
        assert_eq!(outcome.summary.failed, 1);
        assert_eq!(outcome.tickets.len(), 2);
        assert_eq!(outcome.tickets[0].customer_id, "c-1");
        assert_eq!(outcome.tickets[1].customer_id, "c-3");
        // The rejected record is reported at its normalized index.
        assert_eq!(outcome.summary.errors.len(), 1);
        assert_eq!(outcome.summary.errors[0].index, 1);
        assert!(!outcome.summary.errors[0].details.is_empty());
    }

    #[test]
    fn test_malformed_content_aborts_without_summary() {
        let content = format!("{}\nc-1,too,few\nc-2", CSV_HEADER);
        assert!(matches!(
            bulk_import("csv", &content),
            Err(Error::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_fifty_row_batch_counts_fifty() {
        let mut content = CSV_HEADER.to_string();
        for n in 0..50 {
            content.push('\n');
            content.push_str(&csv_row(n));
        }
        let outcome = bulk_import("csv", &content).unwrap();
        assert_eq!(outcome.summary.total, 50);
        assert_eq!(outcome.summary.successful, 50);
        assert!(outcome.summary.errors.is_empty());
    }

    #[test]
    fn test_json_and_xml_share_the_same_accounting() {
        let json = r#"{"tickets": [
            {"customer_id": "c-1", "customer_email": "a@example.com",
             "customer_name": "Ada", "subject": "Login fails",
             "description": "Cannot sign in since this morning."},
            {"customer_id": "c-2"}
        ]}"#;
        let outcome = bulk_import("json", json).unwrap();
        assert_eq!(outcome.summary.total, 2);
        assert_eq!(outcome.summary.successful, 1);
        assert_eq!(outcome.summary.failed, 1);

        let xml = "<tickets><ticket>\
                     <customer_id>c-1</customer_id>\
                     <customer_email>a@example.com</customer_email>\
                     <customer_name>Ada</customer_name>\
                     <subject>Login fails</subject>\
                     <description>Cannot sign in since this morning.</description>\
                   </ticket></tickets>";
        let outcome = bulk_import("xml", xml).unwrap();
        assert_eq!(outcome.summary.total, 1);
        assert_eq!(outcome.summary.successful, 1);
    }
}
