//! Forms CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use form_cli::config::{DATA_FILE_ENV, load_settings, resolve_data_file};
use form_cli::logging::{LogConfig, LogFormat, init_logging};
use form_cli::store::Store;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::Session;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<()> {
    let session = || open_session(cli);
    match &cli.command {
        Command::Types => commands::run_types(),
        Command::Forms => commands::run_forms(&session()?),
        Command::Create(args) => commands::run_create(&session()?, args),
        Command::Update(args) => commands::run_update(&session()?, args),
        Command::Publish(form) => commands::run_publish(&session()?, form),
        Command::Close(form) => commands::run_close(&session()?, form),
        Command::Delete(form) => commands::run_delete(&session()?, form),
        Command::Show(args) => commands::run_show(&session()?, args),
        Command::AddField(args) => commands::run_add_field(&session()?, args),
        Command::UpdateField(args) => commands::run_update_field(&session()?, args),
        Command::RemoveField(field) => commands::run_remove_field(&session()?, field),
        Command::Submit(args) => commands::run_submit(&session()?, args),
        Command::Responses(args) => commands::run_responses(&session()?, args),
        Command::Response(args) => commands::run_response(&session()?, args),
        Command::DeleteResponse(response) => {
            commands::run_delete_response(&session()?, response)
        }
        Command::Export(args) => commands::run_export(&session()?, args),
        Command::Summary(args) => commands::run_summary(&session()?, args),
        Command::Wait(args) => commands::run_wait(&session()?, args),
    }
}

/// Load settings and locate the data file. Only commands touching data need it.
fn open_session(cli: &Cli) -> Result<Session> {
    let settings = load_settings(cli.config.as_deref())?;
    let env_data = std::env::var(DATA_FILE_ENV).ok();
    let data_file = resolve_data_file(cli.data.as_deref(), env_data.as_deref(), &settings)?;
    tracing::debug!(path = %data_file.display(), "using data file");
    Ok(Session {
        store: Store::new(data_file),
        settings,
    })
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
