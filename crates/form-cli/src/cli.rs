//! CLI argument definitions for the forms tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "forms",
    version,
    about = "Build dynamic forms, collect responses and export them as CSV",
    long_about = "Build dynamic forms, collect responses and export them as CSV.\n\n\
                  Forms, fields and responses are kept in a JSON data file.\n\
                  Forms move from draft to active and can be closed and reopened."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include respondent names and emails in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Settings file (default: settings.toml in the platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Data file holding forms and responses.
    #[arg(long = "data", value_name = "PATH", global = true)]
    pub data: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the registered field types.
    Types,

    /// List all forms.
    Forms,

    /// Create a draft form.
    Create(CreateArgs),

    /// Change a form's title and description.
    Update(UpdateArgs),

    /// Open a form for responses.
    Publish(FormRef),

    /// Stop accepting responses.
    Close(FormRef),

    /// Delete a form with its fields and responses.
    Delete(FormRef),

    /// Show a form and its fields.
    Show(ShowArgs),

    /// Add a field to a form.
    AddField(AddFieldArgs),

    /// Redefine a field. Its id and position are kept.
    UpdateField(UpdateFieldArgs),

    /// Remove a field. Existing answers are kept.
    RemoveField(FieldRef),

    /// Submit a response to an active form.
    Submit(SubmitArgs),

    /// Print the responses of a form.
    Responses(ShowArgs),

    /// Print one response.
    Response(ResponseArgs),

    /// Delete one response.
    DeleteResponse(ResponseRef),

    /// Write a form's responses to `<title>_responses.csv`.
    Export(ExportArgs),

    /// Per-field answer counts.
    Summary(ShowArgs),

    /// Poll until a form accepts responses.
    Wait(WaitArgs),
}

#[derive(Args)]
pub struct FormRef {
    /// Form identifier.
    #[arg(value_name = "FORM_ID")]
    pub form: String,
}

#[derive(Args)]
pub struct FieldRef {
    /// Field identifier.
    #[arg(value_name = "FIELD_ID")]
    pub field: String,
}

#[derive(Args)]
pub struct ResponseRef {
    /// Response identifier.
    #[arg(value_name = "RESPONSE_ID")]
    pub response: String,
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub form: FormRef,

    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub form: FormRef,

    /// Locale for labels (default from settings).
    #[arg(long)]
    pub locale: Option<String>,
}

#[derive(Args)]
pub struct AddFieldArgs {
    #[command(flatten)]
    pub form: FormRef,

    #[command(flatten)]
    pub definition: FieldDefinition,
}

#[derive(Args)]
pub struct UpdateFieldArgs {
    #[command(flatten)]
    pub field: FieldRef,

    #[command(flatten)]
    pub definition: FieldDefinition,
}

/// Everything that defines a field, as given on the command line.
#[derive(Args)]
pub struct FieldDefinition {
    /// Label in the default locale.
    #[arg(long)]
    pub label: String,

    /// Field type name (see `forms types`).
    #[arg(long = "type", value_name = "TYPE")]
    pub field_type: String,

    #[arg(long)]
    pub required: bool,

    /// Comma-separated options for choice fields.
    #[arg(long)]
    pub options: Option<String>,

    /// Translated label, repeatable.
    #[arg(long = "translation", value_name = "LOCALE=TEXT")]
    pub translations: Vec<String>,

    #[arg(long)]
    pub placeholder: Option<String>,

    #[arg(long = "help-text")]
    pub help_text: Option<String>,
}

#[derive(Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub form: FormRef,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Answer as FIELD=VALUE, where FIELD is an id or an English label.
    /// Repeat the same field to select several options.
    #[arg(long = "answer", value_name = "FIELD=VALUE")]
    pub answers: Vec<String>,
}

#[derive(Args)]
pub struct ResponseArgs {
    #[command(flatten)]
    pub response: ResponseRef,

    /// Locale for labels and timestamps (default from settings).
    #[arg(long)]
    pub locale: Option<String>,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub form: FormRef,

    /// Output directory (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Locale for column headers (default from settings).
    #[arg(long)]
    pub locale: Option<String>,
}

#[derive(Args)]
pub struct WaitArgs {
    #[command(flatten)]
    pub form: FormRef,

    /// Seconds between polls (default from settings).
    #[arg(long)]
    pub interval: Option<u64>,

    /// Give up after this many polls.
    #[arg(long = "max-polls")]
    pub max_polls: Option<usize>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
