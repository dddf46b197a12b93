use super::{ParseError, parse_day_range, parse_time};
use crate::hours::HoursEntry;
use log::debug;

/// Parses a whole hours string into one entry per weekday per segment.
///
/// Segments are separated by `/`. Each segment is a comma separated day list
/// followed by a single `open - close` range. The first failing segment aborts
/// the parse and nothing is returned for the others. Blank input yields no
/// entries, i.e. an always-closed schedule.
pub fn parse_schedule(text: &str) -> Result<Vec<HoursEntry>, ParseError> {
    let mut entries = Vec::new();
    if text.trim().is_empty() {
        return Ok(entries);
    }
    for segment in text.split('/').map(str::trim) {
        let parsed = parse_segment(segment).map_err(|err| match err {
            ParseError::ScheduleSyntaxError { .. } => err,
            other => ParseError::syntax(segment, other.to_string()),
        })?;
        entries.extend(parsed);
    }
    debug!("parsed {} hours entries from '{}'", entries.len(), text);
    Ok(entries)
}

fn parse_segment(segment: &str) -> Result<Vec<HoursEntry>, ParseError> {
    let tokens: Vec<&str> = segment.split_whitespace().collect();
    let boundary = tokens
        .iter()
        .position(|token| token.chars().any(|c| c.is_ascii_digit()))
        .ok_or_else(|| ParseError::syntax(segment, "no time range found"))?;

    let days_part = tokens[..boundary].join(" ");
    let times_part = tokens[boundary..].join(" ");
    if days_part.trim().is_empty() {
        return Err(ParseError::syntax(segment, "no days listed before time range"));
    }

    let (open_text, close_text) = split_time_range(segment, &times_part)?;
    let open = parse_time(open_text)?;
    let close = parse_time(close_text)?;
    if open == close {
        return Err(ParseError::syntax(
            segment,
            format!("open and close are both {open}; zero-length intervals are not allowed"),
        ));
    }

    let mut entries = Vec::new();
    for day_item in days_part.split(',').map(str::trim) {
        for weekday in parse_day_range(day_item)? {
            entries.push(HoursEntry::new(weekday, open, close));
        }
    }
    Ok(entries)
}

fn split_time_range<'a>(
    segment: &str,
    times_part: &'a str,
) -> Result<(&'a str, &'a str), ParseError> {
    let mut sides = times_part.split('-');
    match (sides.next(), sides.next(), sides.next()) {
        (Some(open), Some(close), None) => Ok((open.trim(), close.trim())),
        (_, None, _) => Err(ParseError::syntax(
            segment,
            format!("Invalid time range format: {times_part}"),
        )),
        _ => Err(ParseError::syntax(
            segment,
            format!("time range has more than one '-': {times_part}"),
        )),
    }
}
