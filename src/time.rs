use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A wall-clock time of day with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeValue {
    hour: u8,
    minute: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub input: String,
    pub reason: String,
}

impl ParseError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for ParseError {}

impl TimeValue {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ParseError> {
        let text = format!("{hour}:{minute:02}");
        Self::checked(hour, minute).map_err(|reason| ParseError::new(&text, reason))
    }

    /// Parse `HH:MM` (24-hour, zero padding optional).
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let trimmed = text.trim();
        let mut fields = trimmed.split(':');
        let (Some(hour), Some(minute), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(ParseError::new(text, "expected HH:MM"));
        };

        let hour = parse_field(hour).ok_or_else(|| ParseError::new(text, "hour is not a number"))?;
        let minute =
            parse_field(minute).ok_or_else(|| ParseError::new(text, "minute is not a number"))?;

        Self::checked(hour, minute).map_err(|reason| ParseError::new(text, reason))
    }

    fn checked(hour: u32, minute: u32) -> Result<Self, &'static str> {
        if hour > 23 {
            return Err("hour must be between 0 and 23");
        }
        if minute > 59 {
            return Err("minute must be between 0 and 59");
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    pub fn format(&self) -> String {
        self.to_string()
    }
}

// Only plain ASCII digits; `u32::from_str` would also take a leading '+'.
fn parse_field(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeValue {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveTime> for TimeValue {
    fn from(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl Serialize for TimeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_stored(&text).map_err(serde::de::Error::custom)
    }
}

/// Older databases stored times as `HH:MM:SS`; accept those when the seconds are zero.
fn parse_stored(text: &str) -> Result<TimeValue, ParseError> {
    match TimeValue::parse(text) {
        Ok(value) => Ok(value),
        Err(err) => {
            let Ok(time) = NaiveTime::parse_from_str(text.trim(), "%H:%M:%S") else {
                return Err(err);
            };
            if time.second() != 0 {
                return Err(ParseError::new(text, "seconds are not supported"));
            }
            Ok(TimeValue::from(time))
        }
    }
}
