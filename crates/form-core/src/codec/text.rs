use form_model::{AnswerValue, Field, RawInput, Result, ValueShape};

use super::{AnswerCodec, single_value};

/// Codec for free-text types (text, textarea, email, number, date).
///
/// Presence is the only rule enforced here; format checks belong to the
/// collecting UI.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl AnswerCodec for TextCodec {
    fn shape(&self) -> ValueShape {
        ValueShape::Text
    }

    fn encode(&self, field: &Field, input: &RawInput) -> Result<AnswerValue> {
        match input {
            // Kept verbatim so textarea line breaks and spacing survive.
            RawInput::One(value) => Ok(AnswerValue::text(value.clone())),
            RawInput::Many(_) => single_value(field, input).map(AnswerValue::text),
        }
    }
}
