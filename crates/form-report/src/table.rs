//! Projection of a form's responses into a rectangular table.

use tracing::debug;

use form_core::{decode_for_field, sort_fields};
use form_model::{ANONYMOUS, Field, Form, Response};

use crate::options::ExportOptions;

/// Columns that precede the field columns in every export.
pub const BASE_COLUMNS: [&str; 3] = ["Respondent Name", "Respondent Email", "Submitted At"];

/// Header plus one row per response. Every row has the header's width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResponseTable {
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of records including the header.
    pub fn record_count(&self) -> usize {
        self.rows.len() + 1
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Header followed by the data rows.
    pub fn records(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.header.as_slice()).chain(self.rows.iter().map(Vec::as_slice))
    }
}

/// Build the export table for `form`.
///
/// Field columns follow display order. Answers to fields that are no longer
/// in `fields` are not exported; unanswered fields render as `-`.
pub fn tabulate(
    form: &Form,
    fields: &[Field],
    responses: &[Response],
    options: &ExportOptions,
) -> ResponseTable {
    let fields = sort_fields(fields);

    let header = BASE_COLUMNS
        .iter()
        .map(|column| (*column).to_string())
        .chain(
            fields
                .iter()
                .map(|field| field.label_text(&options.locale).to_string()),
        )
        .collect();

    let rows = responses
        .iter()
        .map(|response| {
            let mut row = Vec::with_capacity(BASE_COLUMNS.len() + fields.len());
            row.push(response.respondent_name().unwrap_or(ANONYMOUS).to_string());
            row.push(response.respondent_email().unwrap_or_default().to_string());
            row.push(options.format_timestamp(response.submitted_at));
            row.extend(fields.iter().map(|field| decode_for_field(response, field)));
            row
        })
        .collect();

    debug!(
        form_id = %form.id,
        fields = fields.len(),
        responses = responses.len(),
        "responses tabulated"
    );
    ResponseTable { header, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use form_model::{FieldId, FieldType, LocalizedText, OptionMap, ResponseId};

    #[test]
    fn empty_form_has_base_columns_only() {
        let form = Form::new("Empty", "", Utc::now()).unwrap();
        let table = tabulate(&form, &[], &[], &ExportOptions::default());
        assert_eq!(table.header(), BASE_COLUMNS);
        assert_eq!(table.record_count(), 1);
    }

    #[test]
    fn unanswered_field_renders_dash() {
        let form = Form::new("Survey", "", Utc::now()).unwrap();
        let field = Field {
            id: FieldId::new(),
            form_id: form.id,
            label: LocalizedText::en("Comment"),
            field_type: FieldType::Textarea,
            order: 1,
            required: false,
            options: OptionMap::new(),
            placeholder: LocalizedText::new(),
            help_text: LocalizedText::new(),
        };
        let response = Response {
            id: ResponseId::new(),
            form_id: form.id,
            respondent: None,
            submitted_at: Utc::now(),
            answers: Vec::new(),
        };
        let table = tabulate(&form, &[field], &[response], &ExportOptions::default());
        assert_eq!(table.rows()[0][0], "Anonymous");
        assert_eq!(table.rows()[0][1], "");
        assert_eq!(table.rows()[0][3], "-");
    }
}
