//! Plain-text rendering of forms and responses.

use std::fmt::Write as _;

use form_core::{public_view, render_response};
use form_model::{ANONYMOUS, Field, Form, Response};
use form_report::ExportOptions;

/// Heading block for `forms show`.
pub fn form_details(form: &Form) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", form.title);
    let _ = writeln!(out, "id:      {}", form.id);
    let _ = writeln!(
        out,
        "status:  {} ({})",
        form.status,
        public_view(form.status).message()
    );
    if !form.description.is_empty() {
        let _ = writeln!(out, "about:   {}", form.description);
    }
    out
}

/// One block per response: who and when, then each answer as `label: value`.
pub fn responses_text(responses: &[Response], fields: &[Field], options: &ExportOptions) -> String {
    if responses.is_empty() {
        return "No responses yet.\n".to_string();
    }
    let mut out = String::new();
    for (index, response) in responses.iter().enumerate() {
        let who = match (response.respondent_name(), response.respondent_email()) {
            (Some(name), Some(email)) => format!("{name} <{email}>"),
            (Some(name), None) => name.to_string(),
            (None, Some(email)) => format!("{ANONYMOUS} <{email}>"),
            (None, None) => ANONYMOUS.to_string(),
        };
        let _ = writeln!(
            out,
            "#{} {who} at {}",
            index + 1,
            options.format_timestamp(response.submitted_at)
        );
        for answer in render_response(response, fields, &options.locale) {
            let value = answer.value.replace('\n', "\n    ");
            let _ = writeln!(out, "  {}: {value}", answer.label);
        }
    }
    out
}
