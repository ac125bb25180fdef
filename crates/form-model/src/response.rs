use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{FieldId, FieldType, FormId, ResponseId};

/// Name shown for respondents who did not give one.
pub const ANONYMOUS: &str = "Anonymous";

/// Optional identity of whoever submitted a response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Respondent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Respondent {
    /// Build a respondent, treating blank values as absent.
    pub fn new(name: Option<&str>, email: Option<&str>) -> Self {
        Self {
            name: non_blank(name),
            email: non_blank(email),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    /// Same respondent with blank values dropped.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::new(self.name.as_deref(), self.email.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Canonical answer payload.
///
/// The first three variants are the shapes produced by the encoder. Anything
/// else found in stored data is kept as raw JSON so old responses still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// `{"text": "..."}`
    Text { text: String },
    /// `{"selected": "key"}`
    Choice { selected: String },
    /// `{"selected": ["key", ...]}`
    Choices { selected: Vec<String> },
    /// Any other stored payload.
    Other(serde_json::Value),
}

impl AnswerValue {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn choice(key: impl Into<String>) -> Self {
        Self::Choice {
            selected: key.into(),
        }
    }

    pub fn choices<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choices {
            selected: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Selected option keys, empty for non-choice payloads.
    pub fn selected_keys(&self) -> Vec<&str> {
        match self {
            AnswerValue::Choice { selected } => vec![selected.as_str()],
            AnswerValue::Choices { selected } => selected.iter().map(String::as_str).collect(),
            AnswerValue::Text { .. } | AnswerValue::Other(_) => Vec::new(),
        }
    }
}

/// One respondent's value for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub field_id: FieldId,
    /// Type of the field when the answer was given.
    pub field_type: FieldType,
    pub value: AnswerValue,
}

/// A stored submission. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: ResponseId,
    pub form_id: FormId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent: Option<Respondent>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl Response {
    pub fn answer_for(&self, field_id: FieldId) -> Option<&Answer> {
        self.answers.iter().find(|answer| answer.field_id == field_id)
    }

    pub fn respondent_name(&self) -> Option<&str> {
        self.respondent.as_ref().and_then(|r| r.name.as_deref())
    }

    pub fn respondent_email(&self) -> Option<&str> {
        self.respondent.as_ref().and_then(|r| r.email.as_deref())
    }
}

/// Raw user input for one field, before encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInput {
    One(String),
    Many(Vec<String>),
}

impl RawInput {
    /// Returns true if the input carries no non-blank value.
    pub fn is_blank(&self) -> bool {
        match self {
            RawInput::One(value) => value.trim().is_empty(),
            RawInput::Many(values) => values.iter().all(|value| value.trim().is_empty()),
        }
    }
}

impl From<&str> for RawInput {
    fn from(value: &str) -> Self {
        RawInput::One(value.to_string())
    }
}

impl From<Vec<&str>> for RawInput {
    fn from(values: Vec<&str>) -> Self {
        RawInput::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Raw input addressed to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnswer {
    pub field_id: FieldId,
    #[serde(default)]
    pub input: Option<RawInput>,
}

/// Payload of a public submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub form_id: FormId,
    #[serde(default)]
    pub respondent: Option<Respondent>,
    #[serde(default)]
    pub answers: Vec<RawAnswer>,
}

impl SubmissionRequest {
    pub fn new(form_id: FormId) -> Self {
        Self {
            form_id,
            respondent: None,
            answers: Vec::new(),
        }
    }

    #[must_use]
    pub fn respondent(mut self, respondent: Respondent) -> Self {
        self.respondent = Some(respondent);
        self
    }

    #[must_use]
    pub fn answer(mut self, field_id: FieldId, input: impl Into<RawInput>) -> Self {
        self.answers.push(RawAnswer {
            field_id,
            input: Some(input.into()),
        });
        self
    }
}
