use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of the week on a Sunday-first scale: 0 = Sunday, 6 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekDay(u8);

impl WeekDay {
    pub const SUNDAY: WeekDay = WeekDay(0);
    pub const SATURDAY: WeekDay = WeekDay(6);

    pub fn new(index: u8) -> Option<Self> {
        (index < 7).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn previous(self) -> Self {
        Self((self.0 + 6) % 7)
    }

    pub fn next(self) -> Self {
        Self((self.0 + 1) % 7)
    }

    pub fn from_chrono(day: Weekday) -> Self {
        Self(day.num_days_from_sunday() as u8)
    }

    pub fn short_name(self) -> &'static str {
        const NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
        NAMES[self.0 as usize]
    }
}

impl TryFrom<u8> for WeekDay {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        WeekDay::new(value).ok_or_else(|| format!("weekday {value} is outside 0..=6"))
    }
}

impl From<WeekDay> for u8 {
    fn from(day: WeekDay) -> Self {
        day.0
    }
}

impl fmt::Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Wall-clock time with minute resolution. Serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Seconds and sub-second parts are dropped.
    pub fn from_naive(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected HH:MM, got '{s}'"))?;
        let hour: u8 = hour
            .parse()
            .map_err(|_| format!("invalid hour in '{s}'"))?;
        let minute: u8 = minute
            .parse()
            .map_err(|_| format!("invalid minute in '{s}'"))?;
        ClockTime::new(hour, minute).ok_or_else(|| format!("time '{s}' is out of range"))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

/// One contiguous open interval that starts on `weekday` at `open`.
///
/// When `close` is earlier than `open` the interval runs past midnight and
/// ends on the following weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoursEntry {
    #[serde(rename = "day_of_week")]
    pub weekday: WeekDay,
    #[serde(rename = "open_time")]
    pub open: ClockTime,
    #[serde(rename = "close_time")]
    pub close: ClockTime,
}

impl HoursEntry {
    pub fn new(weekday: WeekDay, open: ClockTime, close: ClockTime) -> Self {
        Self {
            weekday,
            open,
            close,
        }
    }

    pub fn wraps_midnight(&self) -> bool {
        self.close < self.open
    }
}

impl fmt::Display for HoursEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.weekday, self.open, self.close)?;
        if self.wraps_midnight() {
            write!(f, " (+1)")?;
        }
        Ok(())
    }
}

/// All opening intervals of one named entity. No entries means always closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub name: String,
    #[serde(default)]
    pub hours: Vec<HoursEntry>,
}

impl Schedule {
    pub fn new(name: impl Into<String>, hours: Vec<HoursEntry>) -> Self {
        Self {
            name: name.into(),
            hours,
        }
    }

    pub fn closed(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }
}
