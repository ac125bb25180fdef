use form_model::{AnswerValue, DEFAULT_LOCALE, Field, FormError, RawInput, Result, ValueShape};

use super::{AnswerCodec, input_values, single_value};

/// Codec for select and radio fields: exactly one option key.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleChoiceCodec;

impl AnswerCodec for SingleChoiceCodec {
    fn shape(&self) -> ValueShape {
        ValueShape::SingleChoice
    }

    fn encode(&self, field: &Field, input: &RawInput) -> Result<AnswerValue> {
        let key = single_value(field, input)?;
        ensure_option(field, key)?;
        Ok(AnswerValue::choice(key))
    }
}

/// Codec for checkbox fields: a set of option keys.
///
/// A scalar input is read as a one-element set. Repeated keys are kept once,
/// in first-seen order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiChoiceCodec;

impl AnswerCodec for MultiChoiceCodec {
    fn shape(&self) -> ValueShape {
        ValueShape::MultiChoice
    }

    fn encode(&self, field: &Field, input: &RawInput) -> Result<AnswerValue> {
        let mut selected: Vec<&str> = Vec::new();
        for key in input_values(input) {
            ensure_option(field, key)?;
            if !selected.contains(&key) {
                selected.push(key);
            }
        }
        Ok(AnswerValue::choices(selected))
    }
}

fn ensure_option(field: &Field, key: &str) -> Result<()> {
    if field.has_option(key) {
        Ok(())
    } else {
        Err(FormError::validation(format!(
            "\"{key}\" is not an option of \"{}\"",
            field.label_text(DEFAULT_LOCALE)
        )))
    }
}
