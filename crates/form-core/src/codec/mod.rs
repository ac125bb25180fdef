//! Answer encoding.
//!
//! The registry maps field type names to codecs. Supporting a new field type
//! means registering a codec for its name; schema and lifecycle code never
//! look at type names.

mod choice;
mod text;

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use form_model::{
    Answer, AnswerValue, DEFAULT_LOCALE, Field, FieldType, FormError, RawInput, Result, ValueShape,
};

pub use choice::{MultiChoiceCodec, SingleChoiceCodec};
pub use text::TextCodec;

/// Turns raw input for one field into its canonical answer value.
pub trait AnswerCodec: Send + Sync {
    /// Shape of the values this codec produces.
    fn shape(&self) -> ValueShape;

    /// Encode non-blank input. Blank input and `required` checks are handled
    /// by [`CodecRegistry::encode`] before this is called.
    fn encode(&self, field: &Field, input: &RawInput) -> Result<AnswerValue>;
}

/// Dispatch table from field type name to codec.
pub struct CodecRegistry {
    codecs: BTreeMap<String, Box<dyn AnswerCodec>>,
}

impl CodecRegistry {
    /// Registry with no codecs.
    pub fn empty() -> Self {
        Self {
            codecs: BTreeMap::new(),
        }
    }

    /// Registry with codecs for every built-in field type.
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        for field_type in FieldType::BUILTIN {
            match field_type.shape() {
                ValueShape::Text => registry.register(field_type.as_str(), TextCodec),
                ValueShape::SingleChoice => {
                    registry.register(field_type.as_str(), SingleChoiceCodec)
                }
                ValueShape::MultiChoice => registry.register(field_type.as_str(), MultiChoiceCodec),
                ValueShape::Unsupported => None,
            };
        }
        registry
    }

    /// Register `codec` for a type name, returning the codec it replaces.
    pub fn register(
        &mut self,
        type_name: &str,
        codec: impl AnswerCodec + 'static,
    ) -> Option<Box<dyn AnswerCodec>> {
        self.codecs.insert(registry_key(type_name), Box::new(codec))
    }

    pub fn get(&self, field_type: &FieldType) -> Option<&dyn AnswerCodec> {
        self.codecs
            .get(&registry_key(field_type.as_str()))
            .map(|codec| &**codec)
    }

    pub fn supports(&self, field_type: &FieldType) -> bool {
        self.get(field_type).is_some()
    }

    /// Registered type names in sorted order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }

    /// Encode input for `field`.
    ///
    /// Missing or blank input yields `Ok(None)` for optional fields.
    ///
    /// # Errors
    ///
    /// `Validation` when a required field has no input, the field type has no
    /// codec, or the codec rejects the input.
    pub fn encode(&self, field: &Field, input: Option<&RawInput>) -> Result<Option<Answer>> {
        let label = field.label_text(DEFAULT_LOCALE);
        let Some(input) = input.filter(|input| !input.is_blank()) else {
            if field.required {
                return Err(FormError::validation(format!("\"{label}\" is required")));
            }
            debug!(field_id = %field.id, "optional field left empty");
            return Ok(None);
        };
        let codec = self.get(&field.field_type).ok_or_else(|| {
            FormError::validation(format!(
                "\"{label}\" has unsupported field type \"{}\"",
                field.field_type
            ))
        })?;
        let value = codec.encode(field, input)?;
        Ok(Some(Answer {
            field_id: field.id,
            field_type: field.field_type.clone(),
            value,
        }))
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("types", &self.codecs.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn registry_key(type_name: &str) -> String {
    type_name.trim().to_ascii_lowercase()
}

/// Non-blank entries of `input`, trimmed.
pub(crate) fn input_values(input: &RawInput) -> Vec<&str> {
    let values: Vec<&str> = match input {
        RawInput::One(value) => vec![value.trim()],
        RawInput::Many(values) => values.iter().map(|value| value.trim()).collect(),
    };
    values
        .into_iter()
        .filter(|value| !value.is_empty())
        .collect()
}

/// The single non-blank entry of `input`.
pub(crate) fn single_value<'a>(field: &Field, input: &'a RawInput) -> Result<&'a str> {
    let values = input_values(input);
    match values.as_slice() {
        [value] => Ok(*value),
        _ => Err(FormError::validation(format!(
            "\"{}\" expects a single value, got {}",
            field.label_text(DEFAULT_LOCALE),
            values.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_model::{FieldId, FormId, LocalizedText, OptionMap};

    fn field(field_type: FieldType, required: bool) -> Field {
        Field {
            id: FieldId::new(),
            form_id: FormId::new(),
            label: LocalizedText::en("Question"),
            field_type,
            order: 1,
            required,
            options: OptionMap::new(),
            placeholder: LocalizedText::new(),
            help_text: LocalizedText::new(),
        }
    }

    struct RatingCodec;

    impl AnswerCodec for RatingCodec {
        fn shape(&self) -> ValueShape {
            ValueShape::Text
        }

        fn encode(&self, field: &Field, input: &RawInput) -> Result<AnswerValue> {
            let value = single_value(field, input)?;
            match value.parse::<u8>() {
                Ok(stars @ 1..=5) => Ok(AnswerValue::text(stars.to_string())),
                _ => Err(FormError::validation("rating must be 1-5")),
            }
        }
    }

    #[test]
    fn builtin_registry_covers_builtin_types() {
        let registry = CodecRegistry::with_builtin();
        for field_type in FieldType::BUILTIN {
            assert!(registry.supports(&field_type), "{field_type}");
        }
        assert!(!registry.supports(&FieldType::Other("rating".into())));
    }

    #[test]
    fn missing_required_input_is_rejected() {
        let registry = CodecRegistry::default();
        let error = registry
            .encode(&field(FieldType::Text, true), Some(&RawInput::from("  ")))
            .unwrap_err();
        assert_eq!(error.to_string(), "validation failed: \"Question\" is required");
    }

    #[test]
    fn missing_optional_input_is_omitted() {
        let registry = CodecRegistry::default();
        let encoded = registry.encode(&field(FieldType::Date, false), None).unwrap();
        assert!(encoded.is_none());
    }

    #[test]
    fn unknown_type_is_unsupported_until_registered() {
        let mut registry = CodecRegistry::default();
        let rating = field(FieldType::Other("Rating".into()), false);
        let input = RawInput::from("4");
        assert!(registry.encode(&rating, Some(&input)).unwrap_err().is_validation());

        assert!(registry.register("rating", RatingCodec).is_none());
        let answer = registry.encode(&rating, Some(&input)).unwrap().unwrap();
        assert_eq!(answer.value, AnswerValue::text("4"));
        assert_eq!(answer.field_type, FieldType::Other("Rating".into()));
        assert!(registry.type_names().any(|name| name == "rating"));
    }
}
