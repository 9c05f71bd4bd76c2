//! Tree adapter.
//!
//! Accepts a single ticket object, an array of objects, or a wrapper object
//! holding the collection under a `tickets` key; all three normalize to
//! drafts in source order. Unparsable input fails the whole call.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{ImportFormat, TagsInput, TicketDraft};

fn malformed(message: impl Into<String>) -> Error {
    Error::MalformedInput {
        format: ImportFormat::Json,
        message: message.into(),
    }
}

/// Normalize a JSON document into drafts, in source order.
pub fn normalize(content: &str) -> Result<Vec<TicketDraft>> {
    let value: Value = serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?;

    let records = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("tickets") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(malformed("\"tickets\" must be an array")),
            None => vec![Value::Object(obj)],
        },
        _ => return Err(malformed("expected an object or an array of objects")),
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| match record {
            Value::Object(obj) => {
                let mut draft = TicketDraft::from_object(&obj);
                // Comma-joined tag strings are an import-format concern;
                // split them here so the validator sees a proper list.
                draft.tags = draft.tags.map(|t| TagsInput::List(t.into_list()));
                Ok(draft)
            }
            _ => Err(malformed(format!("record {} is not an object", index))),
        })
        .collect()
}
