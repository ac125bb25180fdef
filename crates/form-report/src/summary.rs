//! Per-field answer counts.

use form_core::sort_fields;
use form_model::{Field, FieldId, FieldType, Response};

/// How often one option was picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionTally {
    pub key: String,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSummary {
    pub field_id: FieldId,
    pub label: String,
    pub field_type: FieldType,
    /// Responses that answered the field.
    pub answered: usize,
    /// Responses that left it empty.
    pub skipped: usize,
    /// Option counts in key order, followed by stored keys the field no
    /// longer defines. Empty for non-choice fields.
    pub tallies: Vec<OptionTally>,
}

/// Summarize answers for every field, in display order.
pub fn summarize(fields: &[Field], responses: &[Response], locale: &str) -> Vec<FieldSummary> {
    sort_fields(fields)
        .into_iter()
        .map(|field| summarize_field(field, responses, locale))
        .collect()
}

fn summarize_field(field: &Field, responses: &[Response], locale: &str) -> FieldSummary {
    let mut tallies: Vec<OptionTally> = if field.field_type.is_choice() {
        field
            .options
            .iter()
            .map(|(key, label)| OptionTally {
                key: key.clone(),
                label: label.clone(),
                count: 0,
            })
            .collect()
    } else {
        Vec::new()
    };

    let mut answered = 0;
    for answer in responses.iter().filter_map(|response| response.answer_for(field.id)) {
        answered += 1;
        if !field.field_type.is_choice() {
            continue;
        }
        for key in answer.value.selected_keys() {
            match tallies.iter_mut().find(|tally| tally.key == key) {
                Some(tally) => tally.count += 1,
                None => tallies.push(OptionTally {
                    key: key.to_string(),
                    label: key.to_string(),
                    count: 1,
                }),
            }
        }
    }

    FieldSummary {
        field_id: field.id,
        label: field.label_text(locale).to_string(),
        field_type: field.field_type.clone(),
        answered,
        skipped: responses.len() - answered,
        tallies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use form_model::{Answer, AnswerValue, FormId, LocalizedText, ResponseId};

    fn response(field: &Field, value: Option<AnswerValue>) -> Response {
        Response {
            id: ResponseId::new(),
            form_id: field.form_id,
            respondent: None,
            submitted_at: Utc::now(),
            answers: value
                .map(|value| Answer {
                    field_id: field.id,
                    field_type: field.field_type.clone(),
                    value,
                })
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn counts_options_and_stale_keys() {
        let field = Field {
            id: FieldId::new(),
            form_id: FormId::new(),
            label: LocalizedText::en("Fruit"),
            field_type: FieldType::Checkbox,
            order: 1,
            required: false,
            options: [("a", "Apple"), ("b", "Banana")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            placeholder: LocalizedText::new(),
            help_text: LocalizedText::new(),
        };
        let responses = vec![
            response(&field, Some(AnswerValue::choices(["a", "b"]))),
            response(&field, Some(AnswerValue::choices(["a", "c"]))),
            response(&field, None),
        ];

        let summary = summarize(std::slice::from_ref(&field), &responses, "en");
        let fruit = &summary[0];
        assert_eq!((fruit.answered, fruit.skipped), (2, 1));
        let counts: Vec<(&str, usize)> = fruit
            .tallies
            .iter()
            .map(|tally| (tally.label.as_str(), tally.count))
            .collect();
        assert_eq!(counts, vec![("Apple", 2), ("Banana", 1), ("c", 1)]);
    }
}
