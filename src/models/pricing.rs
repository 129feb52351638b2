use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::day::DayName;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub label: String,
    pub weekday_price: i64,
    pub weekend_price: i64,
}

impl TimeSlot {
    pub fn new(label: &str, weekday_price: i64, weekend_price: i64) -> Self {
        Self {
            label: label.to_string(),
            weekday_price,
            weekend_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub weekday_days: Vec<DayName>,
    pub weekend_days: Vec<DayName>,
    pub time_slots: Vec<TimeSlot>,
}

/// Days that fall in neither tier have no defined price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    Weekday,
    Weekend,
    Unclassified,
}

const DEFAULT_TIME_SLOTS: [(&str, i64, i64); 14] = [
    ("6:00 am - 7:30 am", 2800, 3300),
    ("7:40 am - 9:10 am", 2800, 3300),
    ("9:20 am - 10:50 am", 2800, 3300),
    ("11:00 am - 12:30 pm", 2800, 3300),
    ("12:40 pm - 2:10 pm", 2800, 3300),
    ("2:20 pm - 3:50 pm", 2800, 3300),
    ("4:00 pm - 5:30 pm", 4000, 4500),
    ("5:40 pm - 7:10 pm", 4000, 4500),
    ("7:20 pm - 8:50 pm", 4000, 4500),
    ("9:00 pm - 10:30 pm", 4000, 4500),
    ("10:40 pm - 12:10 am", 4000, 4500),
    ("12:20 am - 1:50 am", 3500, 4000),
    ("2:00 am - 3:30 am", 3500, 4000),
    ("3:40 am - 5:10 am", 3500, 4000),
];

pub fn default_time_slots() -> Vec<TimeSlot> {
    DEFAULT_TIME_SLOTS
        .iter()
        .map(|(label, wp, ep)| TimeSlot::new(label, *wp, *ep))
        .collect()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            weekday_days: vec![
                DayName::Monday,
                DayName::Tuesday,
                DayName::Wednesday,
                DayName::Thursday,
            ],
            weekend_days: vec![DayName::Friday, DayName::Saturday, DayName::Sunday],
            time_slots: default_time_slots(),
        }
    }
}

impl PricingConfig {
    pub fn tier_of(&self, date: NaiveDate) -> PriceTier {
        let day = DayName::of(date);
        if self.weekend_days.contains(&day) {
            PriceTier::Weekend
        } else if self.weekday_days.contains(&day) {
            PriceTier::Weekday
        } else {
            PriceTier::Unclassified
        }
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.tier_of(date) == PriceTier::Weekend
    }

    pub fn slot(&self, label: &str) -> Option<&TimeSlot> {
        self.time_slots.iter().find(|s| s.label == label)
    }

    /// Undefined prices (unknown slot, unclassified day) resolve to 0.
    pub fn base_price(&self, date: NaiveDate, label: &str) -> i64 {
        let Some(slot) = self.slot(label) else {
            return 0;
        };
        match self.tier_of(date) {
            PriceTier::Weekend => slot.weekend_price,
            PriceTier::Weekday => slot.weekday_price,
            PriceTier::Unclassified => 0,
        }
    }
}

/// Upper bound accepted for a slot price.
pub const MAX_PRICE: i64 = i64::MAX / 100;

// PUT /api/pricing body
#[derive(Debug, Deserialize)]
pub struct ReplacePricingRequest {
    #[serde(default)]
    pub weekday_days: Vec<String>,
    #[serde(default)]
    pub weekend_days: Vec<String>,
    #[serde(default)]
    pub time_slots: Vec<TimeSlotInput>,
}

#[derive(Debug, Deserialize)]
pub struct TimeSlotInput {
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub weekday_price: i64,
    #[serde(default, deserialize_with = "lenient_price")]
    pub weekend_price: i64,
}

/// Accepts numbers and numeric strings; anything else becomes 0.
fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_price(&value))
}

pub fn coerce_price(value: &serde_json::Value) -> i64 {
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => n.round() as i64,
        _ => 0,
    }
}
