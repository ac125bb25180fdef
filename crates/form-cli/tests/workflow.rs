//! Data file, settings and rendering working together the way the commands use them.

use chrono::{TimeZone, Utc};
use form_cli::config::{Settings, load_settings, read_settings, save_settings};
use form_cli::input::submission_request;
use form_cli::render::responses_text;
use form_cli::store::Store;
use form_core::FormsApi;
use form_model::{FieldSpec, FieldType, Response};
use form_report::ExportOptions;

#[test]
fn settings_round_trip_through_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config").join("settings.toml");
    let mut settings = Settings::default();
    settings.locale = "ar".to_string();
    settings.export.utc_offset_minutes = 120;
    settings.data_file = Some(dir.path().join("forms.json"));

    save_settings(&settings, &path).unwrap();
    assert_eq!(read_settings(&path).unwrap(), settings);
    assert_eq!(load_settings(Some(&path)).unwrap(), settings);
}

#[test]
fn explicit_settings_must_exist_and_parse() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    assert!(load_settings(Some(&missing)).is_err());

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "poll_interval_secs = \"soon\"").unwrap();
    let error = load_settings(Some(&broken)).unwrap_err();
    assert!(format!("{error:#}").contains("parse settings"));
}

#[test]
fn submit_and_render_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(dir.path().join("forms.json"));

    let mut api = store.open().unwrap();
    let form = api.create_form("Lunch survey", "").unwrap();
    api.create_field(form.id, FieldSpec::new("Name", FieldType::Text).required(true))
        .unwrap();
    api.create_field(
        form.id,
        FieldSpec::new("Fruit", FieldType::Checkbox)
            .with_options(form_core::parse_options("Apple, Banana, Cherry")),
    )
    .unwrap();
    let notes = api
        .create_field(form.id, FieldSpec::new("Notes", FieldType::Textarea))
        .unwrap();
    api.publish_form(form.id).unwrap();
    store.save(api.state()).unwrap();

    let mut api = store.open().unwrap();
    let fields = api.list_fields(form.id).unwrap();
    let args = [
        "Name=Ada".to_string(),
        "Fruit=Cherry".to_string(),
        "fruit=Apple".to_string(),
        "Notes=two\nlines".to_string(),
    ];
    let request =
        submission_request(form.id, &fields, Some("Ada"), Some("ada@example.com"), &args).unwrap();
    api.create_response(&request).unwrap();
    api.delete_field(notes.id).unwrap();
    store.save(api.state()).unwrap();

    let api = store.open().unwrap();
    let fields = api.list_fields(form.id).unwrap();
    let responses: Vec<Response> = api
        .list_responses(form.id)
        .unwrap()
        .into_iter()
        .map(|mut response| {
            response.submitted_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
            response
        })
        .collect();

    let text = responses_text(&responses, &fields, &ExportOptions::default());
    insta::assert_snapshot!(text, @r"
#1 Ada <ada@example.com> at 2024-06-01 12:00:00
  Name: Ada
  Fruit: Cherry; Apple
  Unknown field: two
    lines
");
}

#[test]
fn field_edits_and_response_removal_persist() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(dir.path().join("forms.json"));

    let mut api = store.open().unwrap();
    let form = api.create_form("Feedback", "").unwrap();
    let field = api
        .create_field(form.id, FieldSpec::new("Mood", FieldType::Text))
        .unwrap();
    api.publish_form(form.id).unwrap();
    let args = ["Mood=fine".to_string()];
    let request = submission_request(form.id, &[field.clone()], None, None, &args).unwrap();
    let response = api.create_response(&request).unwrap();
    store.save(api.state()).unwrap();

    let mut api = store.open().unwrap();
    api.update_field(
        field.id,
        FieldSpec::new("How do you feel?", FieldType::Textarea),
    )
    .unwrap();
    api.delete_response(response.id).unwrap();
    store.save(api.state()).unwrap();

    let api = store.open().unwrap();
    let fields = api.list_fields(form.id).unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].id, field.id);
    assert_eq!(fields[0].label_text("en"), "How do you feel?");
    assert!(api.list_responses(form.id).unwrap().is_empty());
    assert!(api.get_response(response.id).unwrap_err().is_not_found());
}
