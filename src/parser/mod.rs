//! Parsers for the compact opening-hours notation, e.g.
//! `Mon-Thu 11:00 am - 10:00 pm / Fri-Sat 11:00 am - 1:30 am`.

mod day_range;
mod schedule;
mod time;

pub use day_range::parse_day_range;
pub use schedule::parse_schedule;
pub use time::parse_time;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),
    #[error("Invalid day in range '{0}'")]
    UnknownDayName(String),
    #[error("Error parsing schedule '{segment}': {detail}")]
    ScheduleSyntaxError { segment: String, detail: String },
    #[error(
        "Invalid datetime format '{0}'. Please use ISO format (e.g., '2024-03-15T19:30:00')"
    )]
    InvalidDateTimeFormat(String),
}

impl ParseError {
    pub(crate) fn syntax(segment: &str, detail: impl Into<String>) -> Self {
        ParseError::ScheduleSyntaxError {
            segment: segment.to_string(),
            detail: detail.into(),
        }
    }
}
