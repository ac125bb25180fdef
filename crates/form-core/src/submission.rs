//! Assembly of a stored response from a public submission.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use form_model::{
    FieldId, FormError, RawInput, Respondent, Response, ResponseId, Result, SubmissionRequest,
};

use crate::codec::CodecRegistry;
use crate::lifecycle::ensure_accepting;
use crate::schema::FormSchema;

/// Validate `request` against `schema` and build the response to store.
///
/// Every field is encoded, in display order, even after a failure so the
/// respondent sees all problems at once; validation messages are joined with
/// `"; "`.
///
/// # Errors
///
/// - `Conflict` when the form is not active or an answer repeats a field.
/// - `Validation` when the request targets another form, the form has no
///   fields, an answer names an unknown field or any field fails to encode.
pub fn prepare_response(
    schema: &FormSchema,
    request: &SubmissionRequest,
    registry: &CodecRegistry,
    submitted_at: DateTime<Utc>,
) -> Result<Response> {
    let form = &schema.form;
    if request.form_id != form.id {
        return Err(FormError::validation(format!(
            "submission is for form {}, not {}",
            request.form_id, form.id
        )));
    }
    ensure_accepting(form)?;
    if schema.fields().is_empty() {
        return Err(FormError::validation("form has no fields to answer"));
    }

    let inputs = collect_inputs(schema, request)?;

    let mut answers = Vec::new();
    let mut problems = Vec::new();
    for field in schema.list_fields() {
        match registry.encode(field, inputs.get(&field.id).copied().flatten()) {
            Ok(Some(answer)) => answers.push(answer),
            Ok(None) => {}
            Err(FormError::Validation { message }) => problems.push(message),
            Err(other) => return Err(other),
        }
    }
    if !problems.is_empty() {
        debug!(form_id = %form.id, problems = problems.len(), "submission rejected");
        return Err(FormError::validation(problems.join("; ")));
    }

    let respondent = request
        .respondent
        .as_ref()
        .map(Respondent::normalized)
        .filter(|respondent| !respondent.is_anonymous());

    let response = Response {
        id: ResponseId::new(),
        form_id: form.id,
        respondent,
        submitted_at,
        answers,
    };
    info!(
        form_id = %form.id,
        response_id = %response.id,
        answers = response.answers.len(),
        anonymous = response.respondent.is_none(),
        "response accepted"
    );
    Ok(response)
}

fn collect_inputs<'a>(
    schema: &FormSchema,
    request: &'a SubmissionRequest,
) -> Result<BTreeMap<FieldId, Option<&'a RawInput>>> {
    let mut inputs = BTreeMap::new();
    let mut seen = BTreeSet::new();
    for raw in &request.answers {
        if schema.field(raw.field_id).is_none() {
            return Err(FormError::validation(format!(
                "field {} is not part of this form",
                raw.field_id
            )));
        }
        if !seen.insert(raw.field_id) {
            return Err(FormError::conflict(format!(
                "field {} is answered more than once",
                raw.field_id
            )));
        }
        inputs.insert(raw.field_id, raw.input.as_ref());
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle;
    use form_model::{FieldSpec, FieldType, Form};

    use crate::schema::parse_options;

    fn active_schema() -> FormSchema {
        let mut schema = FormSchema::new(Form::new("Feedback", "", Utc::now()).unwrap());
        schema
            .add_field(FieldSpec::new("Name", FieldType::Text).required(true))
            .unwrap();
        schema
            .add_field(
                FieldSpec::new("Colour", FieldType::Radio).with_options(parse_options("Red,Blue")),
            )
            .unwrap();
        lifecycle::publish(&mut schema.form).unwrap();
        schema
    }

    fn field_id(schema: &FormSchema, label: &str) -> FieldId {
        schema
            .fields()
            .iter()
            .find(|field| field.label_text("en") == label)
            .unwrap()
            .id
    }

    #[test]
    fn accepts_valid_submission() {
        let schema = active_schema();
        let request = SubmissionRequest::new(schema.form.id)
            .respondent(Respondent::new(Some(" Ada "), Some("")))
            .answer(field_id(&schema, "Name"), "Ada")
            .answer(field_id(&schema, "Colour"), "Blue");
        let response =
            prepare_response(&schema, &request, &CodecRegistry::default(), Utc::now()).unwrap();
        assert_eq!(response.answers.len(), 2);
        assert_eq!(response.respondent_name(), Some("Ada"));
        assert_eq!(response.respondent_email(), None);
    }

    #[test]
    fn blank_respondent_is_anonymous() {
        let schema = active_schema();
        let request = SubmissionRequest::new(schema.form.id)
            .respondent(Respondent::new(Some(""), Some(" ")))
            .answer(field_id(&schema, "Name"), "x");
        let response =
            prepare_response(&schema, &request, &CodecRegistry::default(), Utc::now()).unwrap();
        assert!(response.respondent.is_none());
        assert_eq!(response.answers.len(), 1);
    }

    #[test]
    fn reports_every_invalid_field() {
        let schema = active_schema();
        let request =
            SubmissionRequest::new(schema.form.id).answer(field_id(&schema, "Colour"), "Green");
        let error = prepare_response(&schema, &request, &CodecRegistry::default(), Utc::now())
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "validation failed: \"Name\" is required; \"Green\" is not an option of \"Colour\""
        );
    }

    #[test]
    fn draft_form_rejects_submissions() {
        let mut schema = FormSchema::new(Form::new("Draft", "", Utc::now()).unwrap());
        schema
            .add_field(FieldSpec::new("Name", FieldType::Text))
            .unwrap();
        let request = SubmissionRequest::new(schema.form.id);
        let error = prepare_response(&schema, &request, &CodecRegistry::default(), Utc::now())
            .unwrap_err();
        assert!(error.is_conflict());
    }

    #[test]
    fn unknown_field_is_invalid_and_repeated_field_conflicts() {
        let schema = active_schema();
        let registry = CodecRegistry::default();
        let unknown = SubmissionRequest::new(schema.form.id).answer(FieldId::new(), "x");
        assert!(
            prepare_response(&schema, &unknown, &registry, Utc::now())
                .unwrap_err()
                .is_validation()
        );

        let name = field_id(&schema, "Name");
        let repeated = SubmissionRequest::new(schema.form.id)
            .answer(name, "a")
            .answer(name, "b");
        assert!(
            prepare_response(&schema, &repeated, &registry, Utc::now())
                .unwrap_err()
                .is_conflict()
        );
    }
}
