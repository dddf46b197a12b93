use super::ParseError;
use crate::hours::ClockTime;
use once_cell::sync::Lazy;
use regex::Regex;

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)(?::(\d+))?\s*(am|pm)$").expect("clock time pattern is valid")
});

/// Parses a 12-hour clock token such as `11 am` or `10:30 pm`.
///
/// The hour must be 1-12 and the minute 0-59; anything else is rejected
/// rather than mapped onto an out-of-range 24-hour value.
pub fn parse_time(text: &str) -> Result<ClockTime, ParseError> {
    let normalized = text.trim().to_lowercase();
    let invalid = || ParseError::InvalidTimeFormat(normalized.clone());

    let caps = TIME_RE.captures(&normalized).ok_or_else(invalid)?;
    let hour: u8 = caps[1].parse().map_err(|_| invalid())?;
    let minute: u8 = match caps.get(2) {
        Some(m) => m.as_str().parse().map_err(|_| invalid())?,
        None => 0,
    };
    if !(1..=12).contains(&hour) || minute > 59 {
        return Err(invalid());
    }

    let hour = match (&caps[3], hour) {
        ("pm", h) if h != 12 => h + 12,
        ("am", 12) => 0,
        (_, h) => h,
    };
    ClockTime::new(hour, minute).ok_or_else(invalid)
}
