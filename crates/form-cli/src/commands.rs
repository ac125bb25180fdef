use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use form_core::{
    AvailabilityWatch, CodecRegistry, FormsApi, InMemoryApi, StopReason, WatchState,
    wait_until_open,
};
use form_model::{Field, FieldId, FieldSpec, FieldType, FormError, FormId, FormStatus, ResponseId};
use form_report::{export_csv, summarize};

use form_cli::config::Settings;
use form_cli::input::{localized_label, submission_request};
use form_cli::logging::redact;
use form_cli::render::{form_details, responses_text};
use form_cli::store::Store;

use crate::cli::{
    AddFieldArgs, CreateArgs, ExportArgs, FieldDefinition, FieldRef, FormRef, ResponseArgs,
    ResponseRef, ShowArgs, SubmitArgs, UpdateArgs, UpdateFieldArgs, WaitArgs,
};
use crate::summary::{FormRow, answers_table, fields_table, forms_table, types_table};

/// What every command needs: where the data lives and the user's settings.
pub struct Session {
    pub store: Store,
    pub settings: Settings,
}

impl Session {
    fn open(&self) -> Result<InMemoryApi> {
        self.store.open()
    }

    /// Run `change` against the stored state and save the result.
    fn update<T>(&self, change: impl FnOnce(&mut InMemoryApi) -> Result<T>) -> Result<T> {
        let mut api = self.open()?;
        let value = change(&mut api)?;
        self.store.save(api.state())?;
        Ok(value)
    }

    fn locale<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
        flag.unwrap_or(&self.settings.locale)
    }
}

fn form_id(form: &FormRef) -> Result<FormId> {
    Ok(form.form.parse()?)
}

pub fn run_types() -> Result<()> {
    println!("{}", types_table(&CodecRegistry::default()));
    Ok(())
}

pub fn run_forms(session: &Session) -> Result<()> {
    let api = session.open()?;
    let forms = api.list_forms()?;
    if forms.is_empty() {
        println!("No forms yet. Create one with `forms create --title <TITLE>`.");
        return Ok(());
    }
    let mut rows = Vec::with_capacity(forms.len());
    for form in &forms {
        rows.push(FormRow {
            form,
            fields: api.list_fields(form.id)?.len(),
            responses: api.list_responses(form.id)?.len(),
        });
    }
    println!("{}", forms_table(&rows));
    Ok(())
}

pub fn run_create(session: &Session, args: &CreateArgs) -> Result<()> {
    let form = session.update(|api| Ok(api.create_form(&args.title, &args.description)?))?;
    println!("Created draft form {} ({})", form.title, form.id);
    Ok(())
}

pub fn run_update(session: &Session, args: &UpdateArgs) -> Result<()> {
    let id = form_id(&args.form)?;
    let form = session.update(|api| Ok(api.update_form(id, &args.title, &args.description)?))?;
    println!("Updated form {} ({})", form.title, form.id);
    Ok(())
}

pub fn run_publish(session: &Session, form: &FormRef) -> Result<()> {
    let id = form_id(form)?;
    let form = session.update(|api| Ok(api.publish_form(id)?))?;
    println!("{} is now {}", form.title, form.status);
    Ok(())
}

pub fn run_close(session: &Session, form: &FormRef) -> Result<()> {
    let id = form_id(form)?;
    let form = session.update(|api| Ok(api.close_form(id)?))?;
    println!("{} is now {}", form.title, form.status);
    Ok(())
}

pub fn run_delete(session: &Session, form: &FormRef) -> Result<()> {
    let id = form_id(form)?;
    session.update(|api| Ok(api.delete_form(id)?))?;
    println!("Deleted form {id}");
    Ok(())
}

pub fn run_show(session: &Session, args: &ShowArgs) -> Result<()> {
    let id = form_id(&args.form)?;
    let api = session.open()?;
    let form = api.get_form(id)?;
    let fields = api.list_fields(id)?;
    print!("{}", form_details(&form));
    if fields.is_empty() {
        println!("No fields yet.");
    } else {
        println!(
            "{}",
            fields_table(&fields, session.locale(args.locale.as_deref()))
        );
    }
    Ok(())
}

fn field_spec(definition: &FieldDefinition) -> Result<FieldSpec> {
    let field_type: FieldType = definition.field_type.parse()?;
    let mut spec = FieldSpec {
        label: localized_label(&definition.label, &definition.translations)?,
        field_type: Some(field_type),
        required: definition.required,
        ..FieldSpec::default()
    };
    if let Some(options) = &definition.options {
        spec = spec.with_options(form_core::parse_options(options));
    }
    if let Some(placeholder) = &definition.placeholder {
        spec = spec.with_placeholder(placeholder.as_str());
    }
    if let Some(help_text) = &definition.help_text {
        spec = spec.with_help_text(help_text.as_str());
    }
    Ok(spec)
}

fn warn_if_unsupported(field: &Field) {
    if !CodecRegistry::default().supports(&field.field_type) {
        warn!(
            field_type = %field.field_type,
            "field type has no codec, submissions to it will be rejected"
        );
    }
}

pub fn run_add_field(session: &Session, args: &AddFieldArgs) -> Result<()> {
    let id = form_id(&args.form)?;
    let spec = field_spec(&args.definition)?;
    let field = session.update(|api| Ok(api.create_field(id, spec)?))?;
    warn_if_unsupported(&field);
    println!(
        "Added {} field {:?} at position {} ({})",
        field.field_type,
        field.label_text(&session.settings.locale),
        field.order,
        field.id
    );
    Ok(())
}

pub fn run_update_field(session: &Session, args: &UpdateFieldArgs) -> Result<()> {
    let id: FieldId = args.field.field.parse()?;
    let spec = field_spec(&args.definition)?;
    let field = session.update(|api| Ok(api.update_field(id, spec)?))?;
    warn_if_unsupported(&field);
    println!(
        "Updated {} field {:?} at position {} ({})",
        field.field_type,
        field.label_text(&session.settings.locale),
        field.order,
        field.id
    );
    Ok(())
}

pub fn run_remove_field(session: &Session, field: &FieldRef) -> Result<()> {
    let id: FieldId = field.field.parse()?;
    session.update(|api| Ok(api.delete_field(id)?))?;
    println!("Removed field {id}");
    Ok(())
}

pub fn run_submit(session: &Session, args: &SubmitArgs) -> Result<()> {
    let id = form_id(&args.form)?;
    let span = info_span!("submit", form_id = %id);
    let _guard = span.enter();

    let mut api = session.open()?;
    let form = api.get_form(id)?;
    let fields = api.list_fields(id)?;
    let request = submission_request(
        id,
        &fields,
        args.name.as_deref(),
        args.email.as_deref(),
        &args.answers,
    )?;

    let mut watch = AvailabilityWatch::new(form.status);
    watch.begin_submission()?;
    match api.create_response(&request) {
        Ok(response) => {
            watch.submission_succeeded();
            session.store.save(api.state())?;
            info!(
                response_id = %response.id,
                respondent = redact(response.respondent_name().unwrap_or_default()),
                email = redact(response.respondent_email().unwrap_or_default()),
                "response stored"
            );
            println!("Thank you! Response {} recorded.", response.id);
            Ok(())
        }
        Err(error) => {
            let observed = error.is_conflict().then_some(form.status);
            if let WatchState::Stopped(StopReason::StatusChanged(status)) =
                watch.submission_failed(observed)
            {
                println!("This form is {status} and not accepting responses.");
            }
            Err(error.into())
        }
    }
}

pub fn run_responses(session: &Session, args: &ShowArgs) -> Result<()> {
    let id = form_id(&args.form)?;
    let api = session.open()?;
    let form = api.get_form(id)?;
    let fields = api.list_fields(id)?;
    let responses = api.list_responses(id)?;
    let options = session
        .settings
        .export_options(args.locale.as_deref());
    println!("{} ({} responses)", form.title, responses.len());
    print!("{}", responses_text(&responses, &fields, &options));
    Ok(())
}

pub fn run_response(session: &Session, args: &ResponseArgs) -> Result<()> {
    let id: ResponseId = args.response.response.parse()?;
    let api = session.open()?;
    let response = api.get_response(id)?;
    let fields = api.list_fields(response.form_id)?;
    let options = session
        .settings
        .export_options(args.locale.as_deref());
    println!("Response {id} to form {}", response.form_id);
    print!(
        "{}",
        responses_text(std::slice::from_ref(&response), &fields, &options)
    );
    Ok(())
}

pub fn run_delete_response(session: &Session, response: &ResponseRef) -> Result<()> {
    let id: ResponseId = response.response.parse()?;
    session.update(|api| Ok(api.delete_response(id)?))?;
    println!("Deleted response {id}");
    Ok(())
}

pub fn run_export(session: &Session, args: &ExportArgs) -> Result<()> {
    let id = form_id(&args.form)?;
    let api = session.open()?;
    let form = api.get_form(id)?;
    let fields = api.list_fields(id)?;
    let responses = api.list_responses(id)?;
    let options = session
        .settings
        .export_options(args.locale.as_deref());
    let dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create output directory: {}", dir.display()))?;
    let path = export_csv(&form, &fields, &responses, &options, &dir)
        .with_context(|| format!("export responses of {}", form.title))?;
    println!(
        "Exported {} responses to {}",
        responses.len(),
        path.display()
    );
    Ok(())
}

pub fn run_summary(session: &Session, args: &ShowArgs) -> Result<()> {
    let id = form_id(&args.form)?;
    let api = session.open()?;
    let form = api.get_form(id)?;
    let fields = api.list_fields(id)?;
    let responses = api.list_responses(id)?;
    println!("{} ({} responses)", form.title, responses.len());
    let summaries = summarize(&fields, &responses, session.locale(args.locale.as_deref()));
    println!("{}", answers_table(&summaries));
    Ok(())
}

pub fn run_wait(session: &Session, args: &WaitArgs) -> Result<()> {
    let id = form_id(&args.form)?;
    let status = session.open()?.get_form(id)?.status;
    let interval = args
        .interval
        .map_or_else(|| session.settings.poll_interval(), std::time::Duration::from_secs);
    let mut watch = AvailabilityWatch::with_interval(status, interval);

    let fetch = || -> form_model::Result<FormStatus> {
        let api = session
            .open()
            .map_err(|error| FormError::transient(error.to_string()))?;
        api.get_form(id).map(|form| form.status)
    };
    match wait_until_open(&mut watch, fetch, thread::sleep, args.max_polls)? {
        WatchState::Stopped(_) => println!("Form {id} is accepting responses."),
        _ => println!("Form {id} is still not accepting responses."),
    }
    Ok(())
}
