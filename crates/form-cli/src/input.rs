//! Parsing of command-line answer and translation arguments.

use anyhow::{Context, Result, anyhow, bail};

use form_model::{
    DEFAULT_LOCALE, Field, FieldId, FormId, LocalizedText, RawAnswer, RawInput, Respondent,
    SubmissionRequest,
};

/// Split `KEY=VALUE` at the first `=`.
pub fn split_pair(arg: &str) -> Result<(&str, &str)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got {arg:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("missing key in {arg:?}");
    }
    Ok((key, value))
}

/// Label with the default-locale text plus `LOCALE=TEXT` translations.
pub fn localized_label(label: &str, translations: &[String]) -> Result<LocalizedText> {
    let mut text = LocalizedText::en(label.trim());
    for arg in translations {
        let (locale, value) = split_pair(arg).context("parse --translation")?;
        text.insert(locale, value.trim());
    }
    Ok(text)
}

/// Find a field by id or, failing that, by default-locale label
/// (case-insensitive).
pub fn resolve_field<'a>(fields: &'a [Field], key: &str) -> Result<&'a Field> {
    if let Ok(id) = key.parse::<FieldId>()
        && let Some(field) = fields.iter().find(|field| field.id == id)
    {
        return Ok(field);
    }
    let mut matches = fields
        .iter()
        .filter(|field| field.label_text(DEFAULT_LOCALE).eq_ignore_ascii_case(key));
    match (matches.next(), matches.next()) {
        (Some(field), None) => Ok(field),
        (Some(_), Some(_)) => bail!("label {key:?} matches several fields; use the field id"),
        (None, _) => bail!("no field {key:?} in this form"),
    }
}

/// Build a submission from `FIELD=VALUE` arguments.
///
/// Repeating a field collects its values into a list, which is how several
/// checkbox options are chosen.
pub fn submission_request(
    form_id: FormId,
    fields: &[Field],
    name: Option<&str>,
    email: Option<&str>,
    answers: &[String],
) -> Result<SubmissionRequest> {
    let mut request = SubmissionRequest::new(form_id);
    let respondent = Respondent::new(name, email);
    if !respondent.is_anonymous() {
        request = request.respondent(respondent);
    }

    for arg in answers {
        let (key, value) = split_pair(arg).context("parse --answer")?;
        let field = resolve_field(fields, key)?;
        match request
            .answers
            .iter_mut()
            .find(|answer| answer.field_id == field.id)
        {
            Some(existing) => {
                let values = match existing.input.take() {
                    Some(RawInput::One(first)) => vec![first, value.to_string()],
                    Some(RawInput::Many(mut values)) => {
                        values.push(value.to_string());
                        values
                    }
                    None => vec![value.to_string()],
                };
                existing.input = Some(RawInput::Many(values));
            }
            None => request.answers.push(RawAnswer {
                field_id: field.id,
                input: Some(RawInput::One(value.to_string())),
            }),
        }
    }
    Ok(request)
}
