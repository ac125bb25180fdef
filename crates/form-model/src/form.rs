use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{FormError, FormId};

/// Lifecycle state of a form.
///
/// Only [`FormStatus::Active`] forms accept public submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    /// Being prepared; not visible to respondents.
    #[default]
    Draft,
    /// Published and accepting responses.
    Active,
    /// No longer accepting responses. Can be reopened.
    Closed,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Draft => "draft",
            FormStatus::Active => "active",
            FormStatus::Closed => "closed",
        }
    }

    pub fn accepts_responses(&self) -> bool {
        matches!(self, FormStatus::Active)
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormStatus {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(FormStatus::Draft),
            "active" | "published" => Ok(FormStatus::Active),
            "closed" => Ok(FormStatus::Closed),
            _ => Err(FormError::validation(format!("unknown form status: {s}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: FormStatus,
    pub created_at: DateTime<Utc>,
}

impl Form {
    /// Create a draft form. The title must not be blank.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, FormError> {
        let title = normalize_title(&title.into())?;
        Ok(Self {
            id: FormId::new(),
            title,
            description: description.into().trim().to_string(),
            status: FormStatus::Draft,
            created_at,
        })
    }

    pub fn accepts_responses(&self) -> bool {
        self.status.accepts_responses()
    }
}

/// Trim a form title, rejecting blank input.
pub fn normalize_title(title: &str) -> Result<String, FormError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(FormError::validation("form title is required"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_form_starts_as_draft() {
        let form = Form::new("  Survey ", "", Utc::now()).unwrap();
        assert_eq!(form.title, "Survey");
        assert_eq!(form.status, FormStatus::Draft);
        assert!(!form.accepts_responses());
    }

    #[test]
    fn blank_title_is_rejected() {
        let error = Form::new("   ", "desc", Utc::now()).unwrap_err();
        assert!(error.is_validation());
    }

    #[test]
    fn status_parses_legacy_published_name() {
        assert_eq!("Published".parse::<FormStatus>().unwrap(), FormStatus::Active);
        assert!("archived".parse::<FormStatus>().is_err());
    }
}
