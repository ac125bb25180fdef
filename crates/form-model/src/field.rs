use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{FieldId, FieldType, FormId};

/// Locale every label is expected to carry.
pub const DEFAULT_LOCALE: &str = "en";

/// Option key to display text. Keys are unique; display order follows key order.
pub type OptionMap = BTreeMap<String, String>;

/// Text keyed by locale code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text in the default locale only.
    pub fn en(text: impl Into<String>) -> Self {
        Self::new().with(DEFAULT_LOCALE, text)
    }

    #[must_use]
    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(locale, text);
        self
    }

    pub fn insert(&mut self, locale: impl Into<String>, text: impl Into<String>) {
        self.0.insert(locale.into(), text.into());
    }

    /// Exact lookup without fallback.
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Text for `locale`, falling back to the default locale and then to any
    /// non-empty translation. Returns an empty string when nothing is set.
    pub fn resolve(&self, locale: &str) -> &str {
        [locale, DEFAULT_LOCALE]
            .iter()
            .filter_map(|candidate| self.get(candidate))
            .find(|text| !text.trim().is_empty())
            .or_else(|| {
                self.0
                    .values()
                    .map(String::as_str)
                    .find(|text| !text.trim().is_empty())
            })
            .unwrap_or("")
    }

    /// Returns true if the default locale has no usable text.
    pub fn is_default_blank(&self) -> bool {
        self.get(DEFAULT_LOCALE)
            .is_none_or(|text| text.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<&str> for LocalizedText {
    fn from(value: &str) -> Self {
        LocalizedText::en(value)
    }
}

impl From<String> for LocalizedText {
    fn from(value: String) -> Self {
        LocalizedText::en(value)
    }
}

/// One question slot in a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub form_id: FormId,
    pub label: LocalizedText,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Display and export position. Readers sort on it; gaps and ties are legal.
    pub order: u32,
    #[serde(default)]
    pub required: bool,
    /// Populated only for choice types.
    #[serde(default)]
    pub options: OptionMap,
    #[serde(default, skip_serializing_if = "LocalizedText::is_empty")]
    pub placeholder: LocalizedText,
    #[serde(default, skip_serializing_if = "LocalizedText::is_empty")]
    pub help_text: LocalizedText,
}

impl Field {
    pub fn label_text(&self, locale: &str) -> &str {
        self.label.resolve(locale)
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Display text for an option key, if the key exists.
    pub fn option_label(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

/// Operator input for a new field. The schema assigns id, form and order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub label: LocalizedText,
    #[serde(rename = "type", default)]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: OptionMap,
    #[serde(default)]
    pub placeholder: LocalizedText,
    #[serde(default)]
    pub help_text: LocalizedText,
}

impl FieldSpec {
    pub fn new(label: impl Into<LocalizedText>, field_type: FieldType) -> Self {
        Self {
            label: label.into(),
            field_type: Some(field_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: OptionMap) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<LocalizedText>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn with_help_text(mut self, help_text: impl Into<LocalizedText>) -> Self {
        self.help_text = help_text.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_falls_back_to_english() {
        let label = LocalizedText::en("Name").with("ar", "الاسم");
        assert_eq!(label.resolve("ar"), "الاسم");
        assert_eq!(label.resolve("fr"), "Name");
    }

    #[test]
    fn resolve_uses_any_translation_without_english() {
        let label = LocalizedText::new().with("de", "Name (de)");
        assert_eq!(label.resolve("fr"), "Name (de)");
        assert!(label.is_default_blank());
        assert_eq!(LocalizedText::new().resolve("en"), "");
    }

    #[test]
    fn blank_translation_is_skipped() {
        let label = LocalizedText::en("Email").with("ar", "  ");
        assert_eq!(label.resolve("ar"), "Email");
    }
}
