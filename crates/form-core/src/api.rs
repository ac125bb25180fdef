//! Resource operations over forms, fields and responses.
//!
//! [`FormsApi`] is the seam between the core and whatever stores the data.
//! [`InMemoryApi`] keeps everything in an [`ApiState`] value that callers can
//! persist as they see fit.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use form_model::{
    EntityKind, Field, FieldId, FieldSpec, Form, FormError, FormId, FormStatus, Response, ResponseId,
    Result, SubmissionRequest, form::normalize_title,
};

use crate::codec::CodecRegistry;
use crate::lifecycle::{self, Transition};
use crate::schema::FormSchema;
use crate::submission::prepare_response;

/// Operations an operator or public client performs against form storage.
pub trait FormsApi {
    /// All forms, oldest first.
    fn list_forms(&self) -> Result<Vec<Form>>;

    fn get_form(&self, id: FormId) -> Result<Form>;

    /// Create a draft form.
    fn create_form(&mut self, title: &str, description: &str) -> Result<Form>;

    /// Change title and description. Closed forms cannot be edited.
    fn update_form(&mut self, id: FormId, title: &str, description: &str) -> Result<Form>;

    fn publish_form(&mut self, id: FormId) -> Result<Form>;

    fn close_form(&mut self, id: FormId) -> Result<Form>;

    /// Delete a form together with its fields and responses.
    fn delete_form(&mut self, id: FormId) -> Result<()>;

    /// Fields of a form in display order.
    fn list_fields(&self, form_id: FormId) -> Result<Vec<Field>>;

    fn create_field(&mut self, form_id: FormId, spec: FieldSpec) -> Result<Field>;

    /// Redefine a field in place. Fields of closed forms cannot be edited.
    fn update_field(&mut self, id: FieldId, spec: FieldSpec) -> Result<Field>;

    /// Delete a field. Stored answers to it are kept.
    fn delete_field(&mut self, id: FieldId) -> Result<()>;

    /// Responses of a form, oldest first.
    fn list_responses(&self, form_id: FormId) -> Result<Vec<Response>>;

    fn get_response(&self, id: ResponseId) -> Result<Response>;

    fn create_response(&mut self, request: &SubmissionRequest) -> Result<Response>;

    fn delete_response(&mut self, id: ResponseId) -> Result<()>;
}

/// Everything an [`InMemoryApi`] holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiState {
    #[serde(default)]
    pub schemas: Vec<FormSchema>,
    #[serde(default)]
    pub responses: Vec<Response>,
}

impl ApiState {
    pub fn schema(&self, id: FormId) -> Result<&FormSchema> {
        self.schemas
            .iter()
            .find(|schema| schema.form.id == id)
            .ok_or_else(|| FormError::not_found(EntityKind::Form, id))
    }

    fn schema_mut(&mut self, id: FormId) -> Result<&mut FormSchema> {
        self.schemas
            .iter_mut()
            .find(|schema| schema.form.id == id)
            .ok_or_else(|| FormError::not_found(EntityKind::Form, id))
    }

    fn schema_of_field_mut(&mut self, id: FieldId) -> Result<&mut FormSchema> {
        self.schemas
            .iter_mut()
            .find(|schema| schema.field(id).is_some())
            .ok_or_else(|| FormError::not_found(EntityKind::Field, id))
    }
}

/// [`FormsApi`] over an in-process [`ApiState`].
#[derive(Debug, Default)]
pub struct InMemoryApi {
    state: ApiState,
    registry: CodecRegistry,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: ApiState) -> Self {
        Self {
            state,
            registry: CodecRegistry::default(),
        }
    }

    /// Use `registry` to encode submissions.
    #[must_use]
    pub fn with_registry(mut self, registry: CodecRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn state(&self) -> &ApiState {
        &self.state
    }

    pub fn into_state(self) -> ApiState {
        self.state
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    fn transition(&mut self, id: FormId, transition: Transition) -> Result<Form> {
        let schema = self.state.schema_mut(id)?;
        lifecycle::apply(&mut schema.form, transition)?;
        Ok(schema.form.clone())
    }
}

impl FormsApi for InMemoryApi {
    fn list_forms(&self) -> Result<Vec<Form>> {
        let mut forms: Vec<Form> = self
            .state
            .schemas
            .iter()
            .map(|schema| schema.form.clone())
            .collect();
        forms.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(forms)
    }

    fn get_form(&self, id: FormId) -> Result<Form> {
        self.state.schema(id).map(|schema| schema.form.clone())
    }

    fn create_form(&mut self, title: &str, description: &str) -> Result<Form> {
        let form = Form::new(title, description, Utc::now())?;
        info!(form_id = %form.id, title = %form.title, "form created");
        self.state.schemas.push(FormSchema::new(form.clone()));
        Ok(form)
    }

    fn update_form(&mut self, id: FormId, title: &str, description: &str) -> Result<Form> {
        let schema = self.state.schema_mut(id)?;
        if schema.form.status == FormStatus::Closed {
            return Err(FormError::conflict("cannot update a closed form"));
        }
        schema.form.title = normalize_title(title)?;
        schema.form.description = description.trim().to_string();
        info!(form_id = %id, "form updated");
        Ok(schema.form.clone())
    }

    fn publish_form(&mut self, id: FormId) -> Result<Form> {
        self.transition(id, Transition::Publish)
    }

    fn close_form(&mut self, id: FormId) -> Result<Form> {
        self.transition(id, Transition::Close)
    }

    fn delete_form(&mut self, id: FormId) -> Result<()> {
        let before = self.state.schemas.len();
        self.state.schemas.retain(|schema| schema.form.id != id);
        if self.state.schemas.len() == before {
            return Err(FormError::not_found(EntityKind::Form, id));
        }
        let responses = self.state.responses.len();
        self.state.responses.retain(|response| response.form_id != id);
        info!(
            form_id = %id,
            responses_removed = responses - self.state.responses.len(),
            "form deleted"
        );
        Ok(())
    }

    fn list_fields(&self, form_id: FormId) -> Result<Vec<Field>> {
        let schema = self.state.schema(form_id)?;
        Ok(schema.list_fields().into_iter().cloned().collect())
    }

    fn create_field(&mut self, form_id: FormId, spec: FieldSpec) -> Result<Field> {
        let schema = self.state.schema_mut(form_id)?;
        schema.add_field(spec).cloned()
    }

    fn update_field(&mut self, id: FieldId, spec: FieldSpec) -> Result<Field> {
        let schema = self.state.schema_of_field_mut(id)?;
        schema.update_field(id, spec).cloned()
    }

    fn delete_field(&mut self, id: FieldId) -> Result<()> {
        let schema = self.state.schema_of_field_mut(id)?;
        schema.remove_field(id).map(|_| ())
    }

    fn list_responses(&self, form_id: FormId) -> Result<Vec<Response>> {
        self.state.schema(form_id)?;
        let mut responses: Vec<Response> = self
            .state
            .responses
            .iter()
            .filter(|response| response.form_id == form_id)
            .cloned()
            .collect();
        responses.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(responses)
    }

    fn get_response(&self, id: ResponseId) -> Result<Response> {
        self.state
            .responses
            .iter()
            .find(|response| response.id == id)
            .cloned()
            .ok_or_else(|| FormError::not_found(EntityKind::Response, id))
    }

    fn create_response(&mut self, request: &SubmissionRequest) -> Result<Response> {
        let schema = self.state.schema(request.form_id)?;
        let response = prepare_response(schema, request, &self.registry, Utc::now())?;
        self.state.responses.push(response.clone());
        Ok(response)
    }

    fn delete_response(&mut self, id: ResponseId) -> Result<()> {
        let Some(position) = self
            .state
            .responses
            .iter()
            .position(|response| response.id == id)
        else {
            return Err(FormError::not_found(EntityKind::Response, id));
        };
        let removed = self.state.responses.remove(position);
        info!(form_id = %removed.form_id, response_id = %id, "response deleted");
        Ok(())
    }
}

