use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weekday index 0..=6, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayIndex(u8);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayIndexError(pub String);

impl fmt::Display for DayIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid day '{}' (expected 0-6 or a weekday name)", self.0)
    }
}

impl std::error::Error for DayIndexError {}

impl DayIndex {
    pub fn new(index: u8) -> Result<Self, DayIndexError> {
        if index > 6 {
            return Err(DayIndexError(index.to_string()));
        }
        Ok(Self(index))
    }

    pub fn all() -> impl Iterator<Item = DayIndex> {
        (0..7).map(DayIndex)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn weekday(self) -> Weekday {
        Weekday::try_from(self.0).unwrap_or(Weekday::Mon)
    }

    pub fn name(self) -> &'static str {
        match self.weekday() {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl From<Weekday> for DayIndex {
    fn from(day: Weekday) -> Self {
        Self(day.num_days_from_monday() as u8)
    }
}

impl TryFrom<u8> for DayIndex {
    type Error = DayIndexError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DayIndex> for u8 {
    fn from(day: DayIndex) -> Self {
        day.0
    }
}

impl FromStr for DayIndex {
    type Err = DayIndexError;

    /// Accepts `0`..`6` or any weekday name chrono understands (`mon`, `Monday`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<u8>() {
            return Self::new(index).map_err(|_| DayIndexError(s.to_string()));
        }
        s.parse::<Weekday>()
            .map(DayIndex::from)
            .map_err(|_| DayIndexError(s.to_string()))
    }
}

impl fmt::Display for DayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_and_names() {
        assert_eq!("2".parse::<DayIndex>().unwrap().weekday(), Weekday::Wed);
        assert_eq!("sun".parse::<DayIndex>().unwrap().index(), 6);
        assert_eq!("Friday".parse::<DayIndex>().unwrap().index(), 4);
        assert!("7".parse::<DayIndex>().is_err());
        assert!("someday".parse::<DayIndex>().is_err());
    }

    #[test]
    fn serializes_as_map_key_string() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(DayIndex::new(3).unwrap(), 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"3":1}"#);
        let back: std::collections::BTreeMap<DayIndex, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
        assert!(serde_json::from_str::<std::collections::BTreeMap<DayIndex, i32>>(r#"{"9":1}"#).is_err());
    }
}
