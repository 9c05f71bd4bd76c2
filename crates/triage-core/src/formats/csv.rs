//! Delimited-text adapter.
//!
//! Maps a header-row CSV table to pre-validation drafts, one per data row.
//! Cells are whitespace-trimmed; a structurally broken table (ragged rows,
//! unparsable quoting) fails the whole call — no partial record set.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::models::{ImportFormat, TicketDraft};

use super::draft_from_fields;

fn malformed(err: impl std::fmt::Display) -> Error {
    Error::MalformedInput {
        format: ImportFormat::Csv,
        message: err.to_string(),
    }
}

/// Normalize a CSV document into drafts, in row order.
pub fn normalize(content: &str) -> Result<Vec<TicketDraft>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(malformed)?.clone();

    let mut drafts = Vec::new();
    for record in reader.records() {
        let record = record.map_err(malformed)?;
        let mut fields = HashMap::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if !cell.is_empty() {
                fields.insert(header.to_string(), cell.to_string());
            }
        }
        drafts.push(draft_from_fields(fields));
    }
    Ok(drafts)
}
