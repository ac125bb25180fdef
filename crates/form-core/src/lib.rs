//! Form schema handling: field ordering, lifecycle, answer codecs,
//! submission assembly and availability polling.

pub mod api;
pub mod codec;
pub mod decode;
pub mod lifecycle;
pub mod poll;
pub mod schema;
pub mod submission;

pub use api::{ApiState, FormsApi, InMemoryApi};
pub use codec::{AnswerCodec, CodecRegistry};
pub use decode::{
    MISSING_ANSWER, RenderedAnswer, UNKNOWN_FIELD, decode_answer, decode_for_field, decode_value,
    render_response,
};
pub use lifecycle::{PublicView, Transition, public_view};
pub use poll::{AvailabilityWatch, DEFAULT_POLL_INTERVAL, StopReason, WatchState, wait_until_open};
pub use schema::{FormSchema, parse_options, sort_fields};
pub use submission::prepare_response;
