//! Ordering and codec properties of the schema model.

use chrono::Utc;
use form_core::{CodecRegistry, FormSchema, decode_value, parse_options, sort_fields};
use form_model::{
    Field, FieldId, FieldSpec, FieldType, Form, FormId, LocalizedText, OptionMap, RawInput,
};
use proptest::prelude::*;

fn field_with_order(form_id: FormId, order: u32) -> Field {
    Field {
        id: FieldId::new(),
        form_id,
        label: LocalizedText::en(format!("Q{order}")),
        field_type: FieldType::Text,
        order,
        required: false,
        options: OptionMap::new(),
        placeholder: LocalizedText::new(),
        help_text: LocalizedText::new(),
    }
}

#[test]
fn with_fields_drops_foreign_fields() {
    let form = Form::new("Survey", "", Utc::now()).unwrap();
    let own = field_with_order(form.id, 1);
    let foreign = field_with_order(FormId::new(), 1);
    let schema = FormSchema::with_fields(form, vec![own.clone(), foreign]);
    assert_eq!(schema.fields(), std::slice::from_ref(&own));
}

#[test]
fn removing_unknown_field_is_not_found() {
    let mut schema = FormSchema::new(Form::new("Survey", "", Utc::now()).unwrap());
    assert!(schema.remove_field(FieldId::new()).unwrap_err().is_not_found());
}

#[test]
fn closed_form_rejects_new_fields() {
    let mut schema = FormSchema::new(Form::new("Survey", "", Utc::now()).unwrap());
    form_core::lifecycle::publish(&mut schema.form).unwrap();
    form_core::lifecycle::close(&mut schema.form).unwrap();
    let error = schema
        .add_field(FieldSpec::new("Late", FieldType::Text))
        .unwrap_err();
    assert!(error.is_conflict());
}

#[test]
fn choice_field_without_options_is_rejected() {
    let mut schema = FormSchema::new(Form::new("Survey", "", Utc::now()).unwrap());
    let error = schema
        .add_field(FieldSpec::new("Pick", FieldType::Select).with_options(parse_options(" , ")))
        .unwrap_err();
    assert!(error.is_validation());
}

#[test]
fn unknown_type_is_stored_as_given() {
    let mut schema = FormSchema::new(Form::new("Survey", "", Utc::now()).unwrap());
    let field = schema
        .add_field(FieldSpec::new("Stars", FieldType::parse("Rating").unwrap()))
        .unwrap();
    assert_eq!(field.field_type.as_str(), "Rating");
    assert!(!CodecRegistry::default().supports(&field.field_type));
}

proptest! {
    #[test]
    fn list_fields_is_sorted_and_idempotent(orders in prop::collection::vec(0u32..5, 0..12)) {
        let form = Form::new("Survey", "", Utc::now()).unwrap();
        let fields: Vec<Field> = orders
            .iter()
            .map(|order| field_with_order(form.id, *order))
            .collect();
        let schema = FormSchema::with_fields(form, fields.clone());

        let first: Vec<FieldId> = schema.list_fields().iter().map(|field| field.id).collect();
        let second: Vec<FieldId> = schema.list_fields().iter().map(|field| field.id).collect();
        prop_assert_eq!(&first, &second);

        let sorted = sort_fields(&fields);
        for pair in sorted.windows(2) {
            prop_assert!((pair[0].order, pair[0].id) <= (pair[1].order, pair[1].id));
        }
        prop_assert_eq!(sorted.len(), fields.len());
    }

    #[test]
    fn encoded_choices_decode_to_option_labels(
        labels in prop::collection::btree_set("[A-Za-z]{1,8}", 1..6),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..6),
    ) {
        let options: OptionMap = labels
            .iter()
            .enumerate()
            .map(|(index, label)| (format!("k{index}"), label.clone()))
            .collect();
        let keys: Vec<String> = options.keys().cloned().collect();
        let chosen: Vec<&str> = picks.iter().map(|pick| pick.get(&keys).as_str()).collect();

        let mut schema = FormSchema::new(Form::new("Survey", "", Utc::now()).unwrap());
        let field = schema
            .add_field(FieldSpec::new("Pick", FieldType::Checkbox).with_options(options.clone()))
            .unwrap()
            .clone();

        let answer = CodecRegistry::default()
            .encode(&field, Some(&RawInput::from(chosen)))
            .unwrap()
            .unwrap();
        for key in answer.value.selected_keys() {
            prop_assert!(field.has_option(key));
        }
        let decoded = decode_value(&answer.value, Some(&field));
        for part in decoded.split("; ") {
            prop_assert!(options.values().any(|label| label == part));
        }
    }
}
