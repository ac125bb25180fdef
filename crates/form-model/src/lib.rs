//! Data model for dynamic forms: forms, typed fields, responses and answers.

pub mod error;
pub mod field;
pub mod field_type;
pub mod form;
pub mod ids;
pub mod response;

pub use error::{EntityKind, FormError, Result};
pub use field::{DEFAULT_LOCALE, Field, FieldSpec, LocalizedText, OptionMap};
pub use field_type::{FieldType, ValueShape};
pub use form::{Form, FormStatus};
pub use ids::{FieldId, FormId, ResponseId};
pub use response::{
    ANONYMOUS, Answer, AnswerValue, RawAnswer, RawInput, Respondent, Response, SubmissionRequest,
};
