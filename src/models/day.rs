use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One of the seven canonical English day names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayName {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayName {
    pub const ALL: [DayName; 7] = [
        DayName::Sunday,
        DayName::Monday,
        DayName::Tuesday,
        DayName::Wednesday,
        DayName::Thursday,
        DayName::Friday,
        DayName::Saturday,
    ];

    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sun => DayName::Sunday,
            Weekday::Mon => DayName::Monday,
            Weekday::Tue => DayName::Tuesday,
            Weekday::Wed => DayName::Wednesday,
            Weekday::Thu => DayName::Thursday,
            Weekday::Fri => DayName::Friday,
            Weekday::Sat => DayName::Saturday,
        }
    }

    /// Sunday = 0, matching SQLite's `strftime('%w', ...)`.
    pub fn from_index(idx: u32) -> Option<Self> {
        DayName::ALL.get(idx as usize).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayName::Sunday => "Sunday",
            DayName::Monday => "Monday",
            DayName::Tuesday => "Tuesday",
            DayName::Wednesday => "Wednesday",
            DayName::Thursday => "Thursday",
            DayName::Friday => "Friday",
            DayName::Saturday => "Saturday",
        }
    }

    /// Case-insensitive, surrounding whitespace ignored, common short forms accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Some(DayName::Sunday),
            "monday" | "mon" => Some(DayName::Monday),
            "tuesday" | "tue" | "tues" => Some(DayName::Tuesday),
            "wednesday" | "wed" => Some(DayName::Wednesday),
            "thursday" | "thu" | "thur" | "thurs" => Some(DayName::Thursday),
            "friday" | "fri" => Some(DayName::Friday),
            "saturday" | "sat" => Some(DayName::Saturday),
            _ => None,
        }
    }
}

impl fmt::Display for DayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DayName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DayName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DayName::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid day name: {s}")))
    }
}

/// Parses every entry strictly and drops repeats, keeping first-seen order.
pub fn parse_day_list(raw: &[String]) -> Result<Vec<DayName>, String> {
    let mut days = Vec::with_capacity(raw.len());
    for entry in raw {
        if entry.trim().is_empty() {
            continue;
        }
        let day = DayName::parse(entry).ok_or_else(|| format!("invalid day name: {entry}"))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

/// Like [`parse_day_list`] but silently discards entries that are not day names.
pub fn normalize_day_list(raw: &[String]) -> Vec<DayName> {
    let mut days = Vec::with_capacity(raw.len());
    for day in raw.iter().filter_map(|d| DayName::parse(d)) {
        if !days.contains(&day) {
            days.push(day);
        }
    }
    days
}

/// Parses a `YYYY-MM-DD` calendar date. A trailing ISO time part is ignored.
pub fn parse_civil_date(s: &str) -> Option<NaiveDate> {
    let day_part = s.trim().split('T').next().unwrap_or("");
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}
