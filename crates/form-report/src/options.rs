//! Export presentation settings.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use form_model::DEFAULT_LOCALE;

/// Timestamp layout used when none is configured.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How labels and timestamps are rendered in an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Locale used to resolve field labels.
    pub locale: String,
    /// `strftime` layout for the "Submitted At" column.
    pub timestamp_format: String,
    /// Offset from UTC, in minutes, applied before formatting.
    pub utc_offset_minutes: i32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            utc_offset_minutes: 0,
        }
    }
}

impl ExportOptions {
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    #[must_use]
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Offset applied to timestamps. Out-of-range offsets fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                warn!(
                    minutes = self.utc_offset_minutes,
                    "UTC offset out of range, using UTC"
                );
                Utc.fix()
            })
    }

    /// Render a submission timestamp.
    ///
    /// An invalid `timestamp_format` falls back to [`DEFAULT_TIMESTAMP_FORMAT`].
    pub fn format_timestamp(&self, timestamp: DateTime<Utc>) -> String {
        let local = timestamp.with_timezone(&self.offset());
        let format = if is_valid_format(&self.timestamp_format) {
            self.timestamp_format.as_str()
        } else {
            warn!(format = %self.timestamp_format, "invalid timestamp format, using default");
            DEFAULT_TIMESTAMP_FORMAT
        };
        local.format(format).to_string()
    }
}

fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_format_is_utc() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 0).unwrap();
        assert_eq!(ExportOptions::default().format_timestamp(at), "2024-03-09 17:05:00");
    }

    #[test]
    fn offset_shifts_the_wall_clock() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap();
        let options = ExportOptions::default()
            .with_utc_offset_minutes(180)
            .with_timestamp_format("%d/%m/%Y %H:%M");
        assert_eq!(options.format_timestamp(at), "10/03/2024 02:30");
    }

    #[test]
    fn bad_settings_fall_back() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let options = ExportOptions::default()
            .with_utc_offset_minutes(i32::MAX)
            .with_timestamp_format("%Q");
        assert_eq!(options.format_timestamp(at), "2024-01-01 00:00:00");
    }
}
