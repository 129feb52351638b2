use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::day::DayName;

/// Slot list entry meaning "every slot".
pub const ALL_SLOTS: &str = "all";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub id: String,
    pub percent: u8,
    /// Last calendar day the discount applies (inclusive).
    pub until: NaiveDate,
    /// First calendar day the discount applies (inclusive).
    pub created_at: NaiveDate,
    pub reason: String,
    /// Empty means every day.
    pub days: Vec<DayName>,
    /// Empty or containing [`ALL_SLOTS`] means every slot.
    pub slots: Vec<String>,
    pub recorded_at: NaiveDateTime,
}

impl Discount {
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.created_at <= date && date <= self.until
    }

    pub fn applies_to_day(&self, day: DayName) -> bool {
        self.days.is_empty() || self.days.contains(&day)
    }

    pub fn applies_to_slot(&self, label: &str) -> bool {
        self.slots.is_empty() || self.slots.iter().any(|s| s == ALL_SLOTS || s == label)
    }

    pub fn applies(&self, date: NaiveDate, label: &str) -> bool {
        self.is_valid_on(date) && self.applies_to_day(DayName::of(date)) && self.applies_to_slot(label)
    }
}

// POST /api/discounts body
#[derive(Debug, Deserialize)]
pub struct CreateDiscountRequest {
    pub percent: Option<i64>,
    pub until: Option<String>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub slots: Vec<String>,
}
