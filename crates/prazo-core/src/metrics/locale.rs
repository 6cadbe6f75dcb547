//! Weekday labels for the progress histogram.

use chrono::{Locale, NaiveDate, NaiveTime};

/// Produces the short day name shown under each histogram bar.
pub trait DayNameFormatter: Send + Sync {
    fn short_weekday(&self, date: NaiveDate) -> String;
}

/// Brazilian Portuguese abbreviated weekday names ("seg", "ter", ...).
///
/// Uses chrono's pt_BR table, which has no trailing period; browser
/// `Intl` formatting renders the same days as "seg.", "ter.".
#[derive(Debug, Clone, Copy, Default)]
pub struct PtBrWeekdays;

impl DayNameFormatter for PtBrWeekdays {
    fn short_weekday(&self, date: NaiveDate) -> String {
        date.and_time(NaiveTime::MIN)
            .and_utc()
            .format_localized("%a", Locale::pt_BR)
            .to_string()
    }
}
