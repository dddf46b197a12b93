use crate::hours::{ClockTime, HoursEntry, Schedule, WeekDay};
use crate::parser::ParseError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;
use std::fmt;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
];

/// A point in the repeating week: weekday plus wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryInstant {
    pub weekday: WeekDay,
    pub time: ClockTime,
}

impl QueryInstant {
    pub fn new(weekday: WeekDay, time: ClockTime) -> Self {
        Self { weekday, time }
    }

    pub fn from_naive(datetime: NaiveDateTime) -> Self {
        Self {
            weekday: WeekDay::from_chrono(datetime.weekday()),
            time: ClockTime::from_naive(datetime.time()),
        }
    }

    /// Parses an ISO-8601 date-time. A trailing `Z` or numeric offset is
    /// accepted but ignored: the wall-clock time as written is what counts.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse_datetime(text).map(Self::from_naive)
    }
}

impl fmt::Display for QueryInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.weekday, self.time)
    }
}

fn parse_datetime(text: &str) -> Result<NaiveDateTime, ParseError> {
    let trimmed = text.trim();
    for format in NAIVE_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(datetime);
        }
    }

    let with_offset = match trimmed.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };
    for format in OFFSET_FORMATS {
        if let Ok(datetime) = DateTime::parse_from_str(&with_offset, format) {
            return Ok(datetime.naive_local());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| ParseError::InvalidDateTimeFormat(trimmed.to_string()))
}

fn covers(entry: &HoursEntry, at: QueryInstant) -> bool {
    let QueryInstant { weekday, time } = at;
    if entry.weekday == weekday {
        if entry.close > entry.open {
            return entry.open <= time && time < entry.close;
        }
        if entry.close < entry.open {
            return entry.open <= time;
        }
        return false;
    }
    entry.weekday == weekday.previous() && entry.close < entry.open && time < entry.close
}

/// True when any entry covers `at`. Opening is inclusive and closing exclusive,
/// including for intervals carried over from the previous day.
pub fn is_open(entries: &[HoursEntry], at: QueryInstant) -> bool {
    entries.iter().any(|entry| covers(entry, at))
}

/// Names of all schedules open at `at`, sorted and without repeats.
pub fn open_entities<'a, I>(schedules: I, at: QueryInstant) -> Vec<String>
where
    I: IntoIterator<Item = &'a Schedule>,
{
    schedules
        .into_iter()
        .filter(|schedule| is_open(&schedule.hours, at))
        .map(|schedule| schedule.name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
