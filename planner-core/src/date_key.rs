//! Canonical `DD-MM-YYYY` keys for calendar dates.
//!
//! A `DateKey` is the partition key for tasks and day notes in both the local
//! and remote stores. The string form is fixed-width for day and month and
//! never depends on locale. It is NOT chronologically sortable as text, so
//! `Ord` is derived from the underlying date instead.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PlannerError, PlannerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        DateKey(date)
    }

    pub fn today() -> Self {
        DateKey(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Encode as `DD-MM-YYYY`.
    pub fn encode(&self) -> String {
        encode(self.0)
    }

    /// Strict inverse of [`DateKey::encode`].
    pub fn decode(s: &str) -> PlannerResult<Self> {
        decode(s).map(DateKey)
    }
}

/// Encode a date as `DD-MM-YYYY` with zero-padded day and month.
pub fn encode(date: NaiveDate) -> String {
    format!("{:02}-{:02}-{:04}", date.day(), date.month(), date.year())
}

/// Decode a `DD-MM-YYYY` key.
///
/// Only strings that `encode` could have produced are accepted, so
/// `"5-3-2025"` and `"31-02-2025"` are both rejected.
pub fn decode(s: &str) -> PlannerResult<NaiveDate> {
    let invalid = || PlannerError::validation(format!("Invalid date key '{}'. Expected DD-MM-YYYY", s));

    let mut parts = s.splitn(3, '-');
    let (Some(day), Some(month), Some(year)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let day: u32 = day.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;

    if encode(date) != s {
        return Err(invalid());
    }

    Ok(date)
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for DateKey {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateKey::decode(s)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateKey::decode(&s).map_err(serde::de::Error::custom)
    }
}
