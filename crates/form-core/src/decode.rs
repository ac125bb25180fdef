//! Answer decoding for display and export.
//!
//! Decoding never fails. Stored payloads of unknown shape are rendered as
//! compact JSON, and choice keys fall back to the raw key when the field or
//! option no longer exists.

use serde_json::Value;
use tracing::warn;

use form_model::{Answer, AnswerValue, Field, FieldId, Response};

use crate::schema::sort_fields;

/// Rendered value for a field the response did not answer.
pub const MISSING_ANSWER: &str = "-";

/// Label used for answers whose field has been deleted.
pub const UNKNOWN_FIELD: &str = "Unknown field";

/// Separator between the entries of a multi-choice answer.
pub const CHOICE_SEPARATOR: &str = "; ";

/// Human-readable form of one answer value.
pub fn decode_value(value: &AnswerValue, field: Option<&Field>) -> String {
    match value {
        AnswerValue::Text { text } => text.clone(),
        AnswerValue::Choice { selected } => choice_text(selected, field).to_string(),
        AnswerValue::Choices { selected } => selected
            .iter()
            .map(|key| choice_text(key, field))
            .collect::<Vec<_>>()
            .join(CHOICE_SEPARATOR),
        AnswerValue::Other(raw) => decode_raw(raw, field),
    }
}

/// Decode an optional answer, rendering [`MISSING_ANSWER`] when absent.
pub fn decode_answer(answer: Option<&Answer>, field: Option<&Field>) -> String {
    match answer {
        Some(answer) => decode_value(&answer.value, field),
        None => MISSING_ANSWER.to_string(),
    }
}

/// Decode the answer `response` holds for `field`.
pub fn decode_for_field(response: &Response, field: &Field) -> String {
    decode_answer(response.answer_for(field.id), Some(field))
}

fn choice_text<'a>(key: &'a str, field: Option<&'a Field>) -> &'a str {
    field.and_then(|field| field.option_label(key)).unwrap_or(key)
}

fn decode_raw(raw: &Value, field: Option<&Field>) -> String {
    if let Some(text) = raw.get("text").filter(|text| !text.is_null()) {
        return scalar_text(text);
    }
    match raw.get("selected") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(key) => choice_text(key, field).to_string(),
                other => scalar_text(other),
            })
            .collect::<Vec<_>>()
            .join(CHOICE_SEPARATOR),
        Some(Value::String(key)) => choice_text(key, field).to_string(),
        Some(other) if !other.is_null() => scalar_text(other),
        _ => {
            warn!(
                field_id = ?field.map(|field| field.id),
                "answer payload has no known shape, rendering raw JSON"
            );
            raw.to_string()
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// One answer prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAnswer {
    pub field_id: FieldId,
    pub label: String,
    pub value: String,
    /// The answer's field no longer exists in the schema.
    pub orphaned: bool,
}

/// Label and value pairs for a single response.
///
/// Answered fields come first in schema order, followed by answers to fields
/// that have since been deleted, labeled [`UNKNOWN_FIELD`]. Unanswered fields
/// are skipped.
pub fn render_response(response: &Response, fields: &[Field], locale: &str) -> Vec<RenderedAnswer> {
    let mut rendered: Vec<RenderedAnswer> = sort_fields(fields)
        .into_iter()
        .filter_map(|field| {
            let answer = response.answer_for(field.id)?;
            Some(RenderedAnswer {
                field_id: field.id,
                label: field.label_text(locale).to_string(),
                value: decode_value(&answer.value, Some(field)),
                orphaned: false,
            })
        })
        .collect();

    rendered.extend(
        response
            .answers
            .iter()
            .filter(|answer| fields.iter().all(|field| field.id != answer.field_id))
            .map(|answer| RenderedAnswer {
                field_id: answer.field_id,
                label: UNKNOWN_FIELD.to_string(),
                value: decode_value(&answer.value, None),
                orphaned: true,
            }),
    );
    rendered
}
