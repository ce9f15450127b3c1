use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;

use crate::error::{AppError, AppResult};

/// Format used when rendering summary timestamps to API clients.
pub const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Format of the weekly bucket keys.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

fn month_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])$").expect("valid month regex"))
}

/// A calendar month addressed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPeriod {
    year: i32,
    month: u32,
}

impl MonthPeriod {
    pub fn parse(value: &str) -> AppResult<Self> {
        if !month_pattern().is_match(value) {
            return Err(AppError::InvalidInput(
                "month must be in YYYY-MM format".into(),
            ));
        }

        // The pattern guarantees both slices are ASCII digits.
        let year = value[0..4]
            .parse()
            .map_err(|_| AppError::InvalidInput("month must be in YYYY-MM format".into()))?;
        let month = value[5..7]
            .parse()
            .map_err(|_| AppError::InvalidInput("month must be in YYYY-MM format".into()))?;

        Ok(Self { year, month })
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Half-open bounds `[start, end)`: midnight of the first day of this month
    /// to midnight of the first day of the following one.
    pub fn bounds(&self) -> TimeWindow {
        TimeWindow {
            start: self.first_day().and_time(NaiveTime::MIN),
            end: self.next().first_day().and_time(NaiveTime::MIN),
        }
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A half-open interval of naive wall-clock instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// The seven calendar days ending on (and including) a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWeek {
    first: NaiveDate,
    last: NaiveDate,
}

impl TrailingWeek {
    pub const DAYS: u64 = 7;

    /// The week ending today, in the server's local clock.
    pub fn current() -> Self {
        Self::ending_on(Local::now().date_naive())
    }

    pub fn ending_on(today: NaiveDate) -> Self {
        Self {
            first: today - Days::new(Self::DAYS - 1),
            last: today,
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    pub fn bounds(&self) -> TimeWindow {
        TimeWindow {
            start: self.first.and_time(NaiveTime::MIN),
            end: (self.last + Days::new(1)).and_time(NaiveTime::MIN),
        }
    }

    /// Day keys in ascending order, `first` through `last`.
    pub fn day_keys(&self) -> Vec<String> {
        self.first
            .iter_days()
            .take(Self::DAYS as usize)
            .map(day_key)
            .collect()
    }
}

pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parses an ISO-8601 timestamp as sent by the budgeting service.
///
/// Accepts a bare date, or a date and time separated by `T` or a space, with
/// optional fractional seconds and an optional `Z` or `±HH:MM` suffix. Values
/// carrying an offset are converted to the server's local wall clock, the same
/// clock the month and week windows are built in.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    parse_timestamp_in(raw, &Local)
}

/// [`parse_timestamp`] with offset values converted into `tz` instead of `Local`.
pub fn parse_timestamp_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    let normalized = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(stripped) => format!("{}+00:00", stripped),
        None => raw.to_string(),
    };

    const OFFSET_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%d %H:%M%:z",
    ];
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
            return Some(dt.with_timezone(tz).naive_local());
        }
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(&normalized, DAY_KEY_FORMAT)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

pub fn format_display(instant: &NaiveDateTime) -> String {
    instant.format(DISPLAY_FORMAT).to_string()
}
