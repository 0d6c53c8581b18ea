//! Calendar-day normalization and the fixed week-day vocabulary.
//!
//! Host date cells arrive either as plain `YYYY-MM-DD` strings or as full
//! ISO datetimes. Everything downstream works at day granularity, so the
//! time part is always truncated.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::Day;

/// Parse a host date string into a calendar day.
///
/// Accepts `2024-01-07`, `2024-01-07T18:30:00.000Z`, `2024-01-07T18:30:00+01:00`
/// and `2024-01-07 18:30:00`. Offsets are not applied: the calendar date as
/// written is the day.
pub fn parse_day(raw: &str) -> Option<Day> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local().date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    // Last resort: a leading ISO date followed by anything.
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Inclusive iterator over the calendar days from `first` to `last`.
///
/// Yields nothing when `last` is before `first`.
pub fn day_span(first: Day, last: Day) -> impl Iterator<Item = Day> {
    let mut next = Some(first);
    std::iter::from_fn(move || {
        let current = next.filter(|d| *d <= last)?;
        next = current.succ_opt();
        Some(current)
    })
}

// ---------------------------------------------------------------------------
// Day codes
// ---------------------------------------------------------------------------

/// One of the seven day columns of a scheduling week.
///
/// The sequence starts on Sunday: a week whose start date is a Sunday maps
/// `Dim` to the start date itself, `Lun` to the day after, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayCode {
    Dim,
    Lun,
    Mar,
    Mer,
    Jeu,
    Ven,
    Sam,
}

impl DayCode {
    /// All day codes in fixed sequence order.
    pub const ALL: [DayCode; 7] = [
        DayCode::Dim,
        DayCode::Lun,
        DayCode::Mar,
        DayCode::Mer,
        DayCode::Jeu,
        DayCode::Ven,
        DayCode::Sam,
    ];

    /// Position in the fixed sequence (0..7).
    pub fn offset(self) -> usize {
        self as usize
    }

    /// Parse a select-option name into a day code.
    ///
    /// Accepts one- or two-letter abbreviations, French and English day names (full or
    /// three-letter), with or without accents, in any case.
    pub fn parse(name: &str) -> Option<Self> {
        let lowered = name.trim().to_lowercase();
        let code = match lowered.as_str() {
            "d" | "dim" | "dimanche" | "sun" | "sunday" => DayCode::Dim,
            "l" | "lun" | "lundi" | "mon" | "monday" => DayCode::Lun,
            "ma" | "mar" | "mardi" | "tue" | "tuesday" => DayCode::Mar,
            "me" | "mer" | "mercredi" | "wed" | "wednesday" => DayCode::Mer,
            "j" | "jeu" | "jeudi" | "thu" | "thursday" => DayCode::Jeu,
            "v" | "ven" | "vendredi" | "fri" | "friday" => DayCode::Ven,
            "s" | "sam" | "samedi" | "sat" | "saturday" => DayCode::Sam,
            _ => return None,
        };
        Some(code)
    }

    /// Calendar date of this day in a week starting at `start`.
    pub fn date_in_week(self, start: Day) -> Option<Day> {
        start.checked_add_days(Days::new(self.offset() as u64))
    }

    /// Day-of-month number shown in the column header.
    pub fn day_number(self, start: Day) -> Option<u32> {
        self.date_in_week(start).map(|d| d.day())
    }
}

/// Day-of-month numbers for all seven columns of a week.
///
/// A week without a start date has no numbers.
pub fn week_day_numbers(start: Option<Day>) -> [Option<u32>; 7] {
    let mut numbers = [None; 7];
    if let Some(start) = start {
        for code in DayCode::ALL {
            numbers[code.offset()] = code.day_number(start);
        }
    }
    numbers
}
