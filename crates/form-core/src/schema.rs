//! Schema model: a form plus its ordered collection of fields.
//!
//! Field `order` is assigned as `field count + 1` on insertion and never
//! renumbered, so deleting fields leaves gaps and later insertions can repeat
//! an existing order. Every reader goes through [`sort_fields`], which orders
//! by `order` and then by field id, so the sequence is deterministic anyway.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use form_model::{
    EntityKind, Field, FieldId, FieldSpec, Form, FormError, FormStatus, OptionMap, Result,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub form: Form,
    #[serde(default)]
    fields: Vec<Field>,
}

impl FormSchema {
    pub fn new(form: Form) -> Self {
        Self {
            form,
            fields: Vec::new(),
        }
    }

    /// Assemble a schema from separately fetched fields.
    ///
    /// Fields owned by another form are dropped.
    pub fn with_fields(form: Form, fields: Vec<Field>) -> Self {
        let fields = fields
            .into_iter()
            .filter(|field| {
                let owned = field.form_id == form.id;
                if !owned {
                    debug!(field_id = %field.id, form_id = %form.id, "ignoring field of another form");
                }
                owned
            })
            .collect();
        Self { form, fields }
    }

    /// Fields in storage order. Use [`FormSchema::list_fields`] for display order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    /// Append a field built from `spec`.
    ///
    /// # Errors
    ///
    /// `Validation` when the label or type is missing or a choice type has no
    /// options; `Conflict` when the form is closed.
    pub fn add_field(&mut self, spec: FieldSpec) -> Result<&Field> {
        if self.form.status == FormStatus::Closed {
            return Err(FormError::conflict("cannot add a field to a closed form"));
        }
        let field = build_field(&self.form, self.fields.len(), spec)?;
        debug!(
            form_id = %self.form.id,
            field_id = %field.id,
            field_type = %field.field_type,
            order = field.order,
            "field added"
        );
        let index = self.fields.len();
        self.fields.push(field);
        Ok(&self.fields[index])
    }

    /// Replace the definition of field `id` with `spec`.
    ///
    /// Id, owning form and order are kept.
    ///
    /// # Errors
    ///
    /// `NotFound` when the field is not part of the form; otherwise as
    /// [`FormSchema::add_field`].
    pub fn update_field(&mut self, id: FieldId, spec: FieldSpec) -> Result<&Field> {
        if self.form.status == FormStatus::Closed {
            return Err(FormError::conflict("cannot edit a field of a closed form"));
        }
        let Some(position) = self.fields.iter().position(|field| field.id == id) else {
            return Err(FormError::not_found(EntityKind::Field, id));
        };
        let current = &self.fields[position];
        let updated = Field {
            id,
            order: current.order,
            ..build_field(&self.form, 0, spec)?
        };
        debug!(
            form_id = %self.form.id,
            field_id = %id,
            field_type = %updated.field_type,
            "field updated"
        );
        self.fields[position] = updated;
        Ok(&self.fields[position])
    }

    /// Remove a field. Remaining orders are left as they are.
    pub fn remove_field(&mut self, id: FieldId) -> Result<Field> {
        let Some(position) = self.fields.iter().position(|field| field.id == id) else {
            return Err(FormError::not_found(EntityKind::Field, id));
        };
        let removed = self.fields.remove(position);
        debug!(form_id = %self.form.id, field_id = %id, "field removed");
        Ok(removed)
    }

    /// Fields sorted by `order`, ties broken by id.
    pub fn list_fields(&self) -> Vec<&Field> {
        sort_fields(&self.fields)
    }

    pub fn into_parts(self) -> (Form, Vec<Field>) {
        (self.form, self.fields)
    }
}

/// Validate `spec` and turn it into the next field of `form`.
pub fn build_field(form: &Form, existing: usize, spec: FieldSpec) -> Result<Field> {
    let FieldSpec {
        label,
        field_type,
        required,
        options,
        placeholder,
        help_text,
    } = spec;

    if label.is_default_blank() {
        return Err(FormError::validation("field label is required"));
    }
    let field_type = field_type.ok_or_else(|| FormError::validation("field type is required"))?;

    let options = normalize_options(options);
    let options = if field_type.is_choice() {
        if options.is_empty() {
            return Err(FormError::validation(format!(
                "{field_type} fields need at least one option"
            )));
        }
        options
    } else if field_type.is_builtin() {
        if !options.is_empty() {
            debug!(%field_type, "dropping options of a non-choice field");
        }
        OptionMap::new()
    } else {
        options
    };

    let order = u32::try_from(existing + 1)
        .map_err(|_| FormError::validation("form has too many fields"))?;

    Ok(Field {
        id: FieldId::new(),
        form_id: form.id,
        label,
        field_type,
        order,
        required,
        options,
        placeholder,
        help_text,
    })
}

fn normalize_options(options: OptionMap) -> OptionMap {
    options
        .into_iter()
        .filter_map(|(key, text)| {
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            let text = text.trim();
            let text = if text.is_empty() { key } else { text };
            Some((key.to_string(), text.to_string()))
        })
        .collect()
}

/// Parse comma-separated option entry.
///
/// Entries are trimmed and blank ones dropped. Each entry is both key and
/// display text, so repeated labels collapse into a single option.
pub fn parse_options(text: &str) -> OptionMap {
    text.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| (entry.to_string(), entry.to_string()))
        .collect()
}

/// Display order of fields: ascending `order`, then ascending id.
pub fn field_order(a: &Field, b: &Field) -> Ordering {
    a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id))
}

pub fn sort_fields(fields: &[Field]) -> Vec<&Field> {
    let mut sorted: Vec<&Field> = fields.iter().collect();
    sorted.sort_by(|a, b| field_order(a, b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use form_model::{FieldType, LocalizedText};

    fn schema() -> FormSchema {
        FormSchema::new(Form::new("Survey", "", Utc::now()).unwrap())
    }

    #[test]
    fn update_keeps_identity_and_position() {
        let mut schema = schema();
        schema
            .add_field(FieldSpec::new("Name", FieldType::Text))
            .unwrap();
        let colour = schema
            .add_field(FieldSpec::new("Colour", FieldType::Text))
            .unwrap()
            .clone();

        let updated = schema
            .update_field(
                colour.id,
                FieldSpec::new("Favourite colour", FieldType::Select)
                    .required(true)
                    .with_options(parse_options("Red, Blue")),
            )
            .unwrap()
            .clone();
        assert_eq!(updated.id, colour.id);
        assert_eq!(updated.form_id, schema.form.id);
        assert_eq!(updated.order, 2);
        assert_eq!(updated.field_type, FieldType::Select);
        assert!(updated.required);
        assert_eq!(schema.fields().len(), 2);

        let error = schema
            .update_field(colour.id, FieldSpec::new("", FieldType::Text))
            .unwrap_err();
        assert!(error.is_validation());
        assert_eq!(schema.field(colour.id), Some(&updated));

        let error = schema
            .update_field(FieldId::new(), FieldSpec::new("Other", FieldType::Text))
            .unwrap_err();
        assert!(error.is_not_found());
    }

    #[test]
    fn closed_form_fields_cannot_be_updated() {
        let mut schema = schema();
        let id = schema
            .add_field(FieldSpec::new("Name", FieldType::Text))
            .unwrap()
            .id;
        schema.form.status = FormStatus::Closed;
        let error = schema
            .update_field(id, FieldSpec::new("Full name", FieldType::Text))
            .unwrap_err();
        assert!(error.is_conflict());
    }

    #[test]
    fn order_is_count_plus_one() {
        let mut schema = schema();
        let first = schema
            .add_field(FieldSpec::new("Name", FieldType::Text))
            .unwrap()
            .id;
        schema
            .add_field(FieldSpec::new("Email", FieldType::Email))
            .unwrap();
        schema.remove_field(first).unwrap();
        let third = schema
            .add_field(FieldSpec::new("Age", FieldType::Number))
            .unwrap();
        assert_eq!(third.order, 2);
    }

    #[test]
    fn missing_type_or_label_is_rejected() {
        let mut schema = schema();
        let no_type = FieldSpec {
            label: LocalizedText::en("Name"),
            ..FieldSpec::default()
        };
        assert!(schema.add_field(no_type).unwrap_err().is_validation());
        let no_label = FieldSpec::new(LocalizedText::new().with("ar", "x"), FieldType::Text);
        assert!(schema.add_field(no_label).unwrap_err().is_validation());
        assert!(schema.fields().is_empty());
    }

    #[test]
    fn options_are_dropped_for_text_fields() {
        let mut schema = schema();
        let field = schema
            .add_field(FieldSpec::new("Name", FieldType::Text).with_options(parse_options("a,b")))
            .unwrap();
        assert!(field.options.is_empty());
    }

    #[test]
    fn parse_options_trims_and_collapses() {
        let options = parse_options(" Red, Blue ,, Red ,  ");
        let keys: Vec<_> = options.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Blue", "Red"]);
        assert_eq!(options["Blue"], "Blue");
    }
}
