//! Response reporting: CSV export and per-field summaries.

pub mod error;
pub mod export;
pub mod options;
pub mod summary;
pub mod table;

pub use error::{ReportError, Result};
pub use export::{UTF8_BOM, export_csv, export_file_name, render_csv, write_csv};
pub use options::{DEFAULT_TIMESTAMP_FORMAT, ExportOptions};
pub use summary::{FieldSummary, OptionTally, summarize};
pub use table::{BASE_COLUMNS, ResponseTable, tabulate};
