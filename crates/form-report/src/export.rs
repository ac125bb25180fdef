//! CSV rendering of response tables.
//!
//! Output is UTF-8 with a leading byte-order mark, comma separated, one
//! `\n`-terminated line per record. A cell is quoted only when it contains a
//! comma, a double quote or a line break, with inner quotes doubled.

use std::fs::{self, File};
use std::io::{BufWriter, IntoInnerError, Write};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::{info, warn};

use form_model::{Field, Form, Response};

use crate::error::{ReportError, Result};
use crate::options::ExportOptions;
use crate::table::{ResponseTable, tabulate};

/// UTF-8 byte-order mark written before the first record.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Suffix appended to the form title to name an export file.
pub const FILE_SUFFIX: &str = "_responses.csv";

/// Write `table` as CSV to `writer`, starting with the BOM.
pub fn write_csv<W: Write>(table: &ResponseTable, mut writer: W) -> Result<()> {
    writer.write_all(UTF8_BOM)?;
    let mut csv = WriterBuilder::new()
        .delimiter(b',')
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .terminator(Terminator::Any(b'\n'))
        .flexible(false)
        .from_writer(writer);
    for record in table.records() {
        csv.write_record(record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Render `table` as a CSV document, BOM included.
pub fn render_csv(table: &ResponseTable) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// File name for a form's export: the title with path-hostile characters
/// replaced, followed by `_responses.csv`.
pub fn export_file_name(form: &Form) -> String {
    let stem: String = form
        .title
        .trim()
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
            {
                '_'
            } else {
                c
            }
        })
        .collect();
    let stem = stem.trim_matches('.');
    let stem = if stem.is_empty() { "form" } else { stem };
    format!("{stem}{FILE_SUFFIX}")
}

/// Tabulate and write a form's responses into `dir`, replacing any previous
/// export. Returns the written path.
///
/// The document goes to a temporary file that is synced and then renamed over
/// the target, so a failed export never leaves a partial file behind.
pub fn export_csv(
    form: &Form,
    fields: &[Field],
    responses: &[Response],
    options: &ExportOptions,
    dir: &Path,
) -> Result<PathBuf> {
    let table = tabulate(form, fields, responses, options);
    let path = dir.join(export_file_name(form));
    let temp_path = path.with_extension("csv.tmp");

    if let Err(error) = write_export_file(&table, &temp_path, &path) {
        if temp_path.exists()
            && let Err(cleanup) = fs::remove_file(&temp_path)
        {
            warn!(path = %temp_path.display(), %cleanup, "failed to remove temporary export");
        }
        return Err(with_path(error, path));
    }

    info!(
        form_id = %form.id,
        path = %path.display(),
        rows = table.rows().len(),
        columns = table.column_count(),
        "responses exported"
    );
    Ok(path)
}

fn write_export_file(table: &ResponseTable, temp_path: &Path, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(temp_path)?);
    write_csv(table, &mut writer)?;
    let file = writer.into_inner().map_err(IntoInnerError::into_error)?;
    file.sync_all()?;
    fs::rename(temp_path, path)?;
    Ok(())
}

/// Attach the export path to I/O failures.
fn with_path(error: ReportError, path: PathBuf) -> ReportError {
    match error {
        ReportError::Write(source) => ReportError::File { path, source },
        ReportError::Csv(error) if error.is_io_error() => ReportError::File {
            path,
            source: error.into(),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn form(title: &str) -> Form {
        Form::new(title, "", Utc::now()).unwrap()
    }

    #[test]
    fn file_name_keeps_spaces_and_replaces_separators() {
        assert_eq!(export_file_name(&form("Lunch survey")), "Lunch survey_responses.csv");
        assert_eq!(export_file_name(&form("Q1/Q2: plan?")), "Q1_Q2_ plan__responses.csv");
        assert_eq!(export_file_name(&form("..")), "form_responses.csv");
    }

    #[test]
    fn export_replaces_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let form = form("Poll");
        let table_path =
            export_csv(&form, &[], &[], &ExportOptions::default(), dir.path()).unwrap();
        fs::write(&table_path, "stale").unwrap();

        let path = export_csv(&form, &[], &[], &ExportOptions::default(), dir.path()).unwrap();
        assert_eq!(path, table_path);
        assert!(fs::read_to_string(&path).unwrap().starts_with('\u{feff}'));
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn failed_export_reports_path_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let form = form("Poll");
        let target = dir.path().join(export_file_name(&form));
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "occupied").unwrap();

        let error =
            export_csv(&form, &[], &[], &ExportOptions::default(), dir.path()).unwrap_err();
        match error {
            ReportError::File { path, .. } => assert_eq!(path, target),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!target.with_extension("csv.tmp").exists());

        let missing = dir.path().join("missing");
        let error = export_csv(&form, &[], &[], &ExportOptions::default(), &missing).unwrap_err();
        assert!(matches!(error, ReportError::File { .. }), "{error}");
    }

    #[test]
    fn document_starts_with_bom() {
        let table = tabulate(&form("T"), &[], &[], &ExportOptions::default());
        let csv = render_csv(&table).unwrap();
        assert!(csv.starts_with('\u{feff}'));
        assert_eq!(
            csv.trim_start_matches('\u{feff}'),
            "Respondent Name,Respondent Email,Submitted At\n"
        );
    }
}
