//! Markup adapter.
//!
//! Accepts a document whose root is a single `<ticket>` element, a
//! `<tickets>` wrapper around a collection, or sibling-repeated `<ticket>`
//! elements; each ticket element's child text becomes a flat field record.
//! A document that parses but contains no ticket element yields an empty
//! sequence; a document that does not parse at all fails the whole call.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::models::{ImportFormat, TicketDraft};

use super::draft_from_fields;

fn malformed(err: impl std::fmt::Display) -> Error {
    Error::MalformedInput {
        format: ImportFormat::Xml,
        message: err.to_string(),
    }
}

/// Normalize an XML document into drafts, in document order.
pub fn normalize(content: &str) -> Result<Vec<TicketDraft>> {
    let mut reader = Reader::from_str(content);

    let mut drafts = Vec::new();
    let mut in_ticket = false;
    // Element path below <ticket>; one level of nesting gives dotted keys
    // like "metadata.source".
    let mut path: Vec<String> = Vec::new();
    let mut fields: HashMap<String, String> = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if in_ticket {
                    path.push(name);
                } else if name == "ticket" {
                    in_ticket = true;
                    path.clear();
                    fields = HashMap::new();
                }
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if !in_ticket && name == "ticket" {
                    drafts.push(draft_from_fields(HashMap::new()));
                }
            }
            Ok(Event::End(e)) => {
                if in_ticket {
                    if path.is_empty() {
                        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                        if name == "ticket" {
                            in_ticket = false;
                            drafts.push(draft_from_fields(std::mem::take(&mut fields)));
                        }
                    } else {
                        path.pop();
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if in_ticket && !path.is_empty() {
                    let text = t.unescape().map_err(malformed)?;
                    append_field(&mut fields, &path, text.trim());
                }
            }
            Ok(Event::CData(t)) => {
                if in_ticket && !path.is_empty() {
                    let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                    append_field(&mut fields, &path, text.trim());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(e)),
        }
    }

    if in_ticket {
        return Err(malformed("unclosed <ticket> element"));
    }
    Ok(drafts)
}

/// Record text under the current dotted path; repeated leaves (e.g. several
/// `<tag>` elements) accumulate comma-joined so they split like any other
/// tag list.
fn append_field(fields: &mut HashMap<String, String>, path: &[String], text: &str) {
    if text.is_empty() {
        return;
    }
    let key = path.join(".");
    fields
        .entry(key)
        .and_modify(|existing| {
            existing.push(',');
            existing.push_str(text);
        })
        .or_insert_with(|| text.to_string());
}
