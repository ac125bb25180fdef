//! Field type taxonomy.
//!
//! Every field carries one of these types. The type decides the shape of the
//! canonical answer value:
//!
//! | Type | Answer payload |
//! |---|---|
//! | text, textarea, email, number, date | `{"text": string}` |
//! | select, radio | `{"selected": string}` |
//! | checkbox | `{"selected": [string]}` |
//!
//! Names outside the built-in set are kept verbatim in [`FieldType::Other`]
//! so a stored schema survives a round trip even when this build cannot
//! encode answers for it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FormError;

/// Type of a form field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Single-line free text.
    Text,
    /// Multi-line free text.
    Textarea,
    /// Numeric entry, stored as text.
    Number,
    /// Email address, stored as text.
    Email,
    /// Calendar date, stored as text.
    Date,
    /// Drop-down with exactly one chosen option.
    Select,
    /// Radio group with exactly one chosen option.
    Radio,
    /// Checkbox group with any number of chosen options.
    Checkbox,
    /// A type name this build does not know. Stored as given.
    Other(String),
}

/// Shape of the canonical answer payload for a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueShape {
    /// `{"text": string}`
    Text,
    /// `{"selected": string}`
    SingleChoice,
    /// `{"selected": [string]}`
    MultiChoice,
    /// No built-in encoding.
    Unsupported,
}

impl FieldType {
    /// Built-in types in the order they are presented to operators.
    pub const BUILTIN: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Email,
        FieldType::Date,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
    ];

    /// Parse a type name (case-insensitive). Unknown names become [`FieldType::Other`].
    /// Returns `None` for a blank name.
    pub fn parse(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        let parsed = match trimmed.to_ascii_lowercase().as_str() {
            "text" => FieldType::Text,
            "textarea" => FieldType::Textarea,
            "number" => FieldType::Number,
            "email" => FieldType::Email,
            "date" => FieldType::Date,
            "select" => FieldType::Select,
            "radio" => FieldType::Radio,
            "checkbox" => FieldType::Checkbox,
            _ => FieldType::Other(trimmed.to_string()),
        };
        Some(parsed)
    }

    /// Canonical lowercase name, or the stored name for unknown types.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Email => "email",
            FieldType::Date => "date",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Other(name) => name.as_str(),
        }
    }

    pub fn shape(&self) -> ValueShape {
        match self {
            FieldType::Text
            | FieldType::Textarea
            | FieldType::Number
            | FieldType::Email
            | FieldType::Date => ValueShape::Text,
            FieldType::Select | FieldType::Radio => ValueShape::SingleChoice,
            FieldType::Checkbox => ValueShape::MultiChoice,
            FieldType::Other(_) => ValueShape::Unsupported,
        }
    }

    /// Returns true if fields of this type carry an option mapping.
    pub fn is_choice(&self) -> bool {
        matches!(
            self.shape(),
            ValueShape::SingleChoice | ValueShape::MultiChoice
        )
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, FieldType::Other(_))
    }

    /// Short description of the expected input, for listings.
    pub fn input_hint(&self) -> &'static str {
        match self {
            FieldType::Text | FieldType::Email | FieldType::Number | FieldType::Date => {
                "single value"
            }
            FieldType::Textarea => "multi-line text",
            FieldType::Select | FieldType::Radio => "one option key",
            FieldType::Checkbox => "set of option keys",
            FieldType::Other(_) => "unsupported",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::parse(s).ok_or_else(|| FormError::validation("field type is required"))
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        FieldType::parse(&value).unwrap_or(FieldType::Other(value))
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        match value {
            FieldType::Other(name) => name,
            builtin => builtin.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(FieldType::parse("CheckBox"), Some(FieldType::Checkbox));
        assert_eq!(FieldType::parse(" textarea "), Some(FieldType::Textarea));
        assert_eq!(FieldType::parse("  "), None);
    }

    #[test]
    fn unknown_names_keep_their_trimmed_spelling() {
        let parsed = FieldType::parse("Rating").unwrap();
        assert_eq!(parsed, FieldType::Other("Rating".to_string()));
        assert_eq!(parsed.as_str(), "Rating");
        assert_eq!(parsed.shape(), ValueShape::Unsupported);

        let padded = FieldType::parse(" Rating ").unwrap();
        assert_eq!(padded, parsed);
        assert_eq!(padded.to_string(), "Rating");
    }

    #[test]
    fn choice_types() {
        let choices: Vec<_> = FieldType::BUILTIN
            .iter()
            .filter(|t| t.is_choice())
            .map(FieldType::as_str)
            .collect();
        assert_eq!(choices, vec!["select", "radio", "checkbox"]);
    }

    #[test]
    fn serde_uses_plain_names() {
        let json = serde_json::to_string(&FieldType::Radio).unwrap();
        assert_eq!(json, "\"radio\"");
        let other: FieldType = serde_json::from_str("\"signature\"").unwrap();
        assert_eq!(other, FieldType::Other("signature".to_string()));
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"signature\"");
    }

    #[test]
    fn blank_type_is_a_validation_error() {
        let error = "".parse::<FieldType>().unwrap_err();
        assert!(error.is_validation());
    }
}
