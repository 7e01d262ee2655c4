use std::fmt;

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;

use crate::error::Result;

/// Where a due date falls relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStatus {
    Past,
    Soon,
    Later,
}

impl DateStatus {
    /// Number of days ahead of today that still count as [`DateStatus::Soon`].
    pub const SOON_DAYS: i64 = 7;

    pub fn of(due: NaiveDate, today: NaiveDate) -> DateStatus {
        if due < today {
            return DateStatus::Past;
        }

        match (due - today).num_days() {
            n if n < Self::SOON_DAYS => DateStatus::Soon,
            _ => DateStatus::Later,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DateStatus::Past => "past",
            DateStatus::Soon => "soon",
            DateStatus::Later => "later",
        }
    }
}

impl fmt::Display for DateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/// Parses exactly `YYYY-MM-DD`. Anything else, including out-of-range days,
/// is `None`.
pub fn parse_date(string: &str) -> Option<NaiveDate> {
    let bytes = string.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }

    let digits = |range: std::ops::Range<usize>| -> Option<u32> {
        let part = &bytes[range];
        if !part.iter().all(u8::is_ascii_digit) {
            return None;
        }

        Some(part.iter().fold(0, |n, b| n * 10 + u32::from(b - b'0')))
    };

    let year = digits(0..4)?;
    let month = digits(5..7)?;
    let day = digits(8..10)?;
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

/// Parses a UTC offset of the form `+HH:MM`, `-HH:MM` or `Z`.
pub fn parse_utc_offset(string: &str) -> Result<FixedOffset> {
    let string = string.trim();
    if string.eq_ignore_ascii_case("z") || string.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let invalid = || error!("invalid UTC offset", "offset" => string, "expected `+HH:MM`");
    let (sign, rest) = match string.as_bytes().first() {
        Some(b'+') => (1, &string[1..]),
        Some(b'-') => (-1, &string[1..]),
        _ => return Err(invalid()),
    };

    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// The source of "today" for date classification: the current date in a fixed
/// reference zone, or a pinned date.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    pub offset: FixedOffset,
    pub pinned: Option<NaiveDate>,
}

impl Clock {
    pub fn new(offset: FixedOffset) -> Self {
        Clock { offset, pinned: None }
    }

    pub fn pinned(date: NaiveDate) -> Self {
        Clock { offset: Utc.fix(), pinned: Some(date) }
    }

    pub fn today(&self) -> NaiveDate {
        match self.pinned {
            Some(date) => date,
            None => Utc::now().with_timezone(&self.offset).date_naive(),
        }
    }
}
