use crate::time::{ParseError, TimeValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One block of busy time, `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeRecord", into = "RangeRecord")]
pub struct BusyRange {
    from: TimeValue,
    to: TimeValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRangeError {
    pub from: TimeValue,
    pub to: TimeValue,
}

impl fmt::Display for InvalidRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "range starts at {} but ends earlier at {}", self.from, self.to)
    }
}

impl std::error::Error for InvalidRangeError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    Parse(ParseError),
    InvalidRange(InvalidRangeError),
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::Parse(err) => write!(f, "{err}"),
            RangeError::InvalidRange(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RangeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RangeError::Parse(err) => Some(err),
            RangeError::InvalidRange(err) => Some(err),
        }
    }
}

impl From<ParseError> for RangeError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<InvalidRangeError> for RangeError {
    fn from(value: InvalidRangeError) -> Self {
        Self::InvalidRange(value)
    }
}

impl BusyRange {
    pub fn new(from: TimeValue, to: TimeValue) -> Result<Self, InvalidRangeError> {
        if from > to {
            return Err(InvalidRangeError { from, to });
        }
        Ok(Self { from, to })
    }

    /// Ranges produced by the union sweep are not re-validated.
    pub(crate) fn new_unchecked(from: TimeValue, to: TimeValue) -> Self {
        Self { from, to }
    }

    pub fn new_from_text(from_text: &str, to_text: &str) -> Result<Self, RangeError> {
        let from = TimeValue::parse(from_text)?;
        let to = TimeValue::parse(to_text)?;
        Ok(Self::new(from, to)?)
    }

    /// Parse `HH:MM-HH:MM`. The `—` separator used by [`BusyRange`]'s display form is accepted too.
    pub fn parse(text: &str) -> Result<Self, RangeError> {
        let Some((from, to)) = text.split_once('-').or_else(|| text.split_once('—')) else {
            return Err(RangeError::Parse(ParseError {
                input: text.to_string(),
                reason: "expected FROM-TO".into(),
            }));
        };
        Self::new_from_text(from, to)
    }

    pub fn from(&self) -> TimeValue {
        self.from
    }

    pub fn to(&self) -> TimeValue {
        self.to
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    pub fn duration_minutes(&self) -> u32 {
        self.to.minutes_since_midnight() - self.from.minutes_since_midnight()
    }
}

impl fmt::Display for BusyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} — {}", self.from, self.to)
    }
}

impl TryFrom<(TimeValue, TimeValue)> for BusyRange {
    type Error = InvalidRangeError;

    fn try_from((from, to): (TimeValue, TimeValue)) -> Result<Self, Self::Error> {
        Self::new(from, to)
    }
}

impl TryFrom<(&str, &str)> for BusyRange {
    type Error = RangeError;

    fn try_from((from, to): (&str, &str)) -> Result<Self, Self::Error> {
        Self::new_from_text(from, to)
    }
}

#[derive(Serialize, Deserialize)]
struct RangeRecord {
    from: TimeValue,
    to: TimeValue,
}

impl TryFrom<RangeRecord> for BusyRange {
    type Error = InvalidRangeError;

    fn try_from(record: RangeRecord) -> Result<Self, Self::Error> {
        Self::new(record.from, record.to)
    }
}

impl From<BusyRange> for RangeRecord {
    fn from(range: BusyRange) -> Self {
        Self {
            from: range.from,
            to: range.to,
        }
    }
}
