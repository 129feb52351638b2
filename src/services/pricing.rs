//! Owns the lifecycle of the singleton pricing table: it is created on
//! first use, repaired whenever it is read, and replaced wholesale on save.

use std::collections::HashSet;

use rusqlite::Connection;

use crate::db::queries::{self, StoredPricing};
use crate::errors::AppError;
use crate::models::day::{normalize_day_list, parse_day_list};
use crate::models::pricing::{default_time_slots, MAX_PRICE};
use crate::models::{DayName, PricingConfig, ReplacePricingRequest, TimeSlot};

/// Writes the default table if none exists yet.
pub fn ensure_initialized(conn: &Connection) -> Result<(), AppError> {
    if queries::get_pricing(conn)?.is_none() {
        let config = PricingConfig::default();
        queries::save_pricing(conn, &config.weekday_days, &config.weekend_days, &config.time_slots)?;
        tracing::info!(slots = config.time_slots.len(), "created default pricing table");
    }
    Ok(())
}

/// Returns the current table, persisting any repair it needed.
pub fn get_config(conn: &Connection) -> Result<PricingConfig, AppError> {
    let Some(stored) = queries::get_pricing(conn)? else {
        ensure_initialized(conn)?;
        return Ok(PricingConfig::default());
    };

    let (config, repaired) = repair(&stored);
    if repaired {
        tracing::warn!(
            weekday_days = ?config.weekday_days,
            weekend_days = ?config.weekend_days,
            slots = config.time_slots.len(),
            "repaired stored pricing table"
        );
        queries::save_pricing(conn, &config.weekday_days, &config.weekend_days, &config.time_slots)?;
    }
    Ok(config)
}

pub fn replace_config(conn: &Connection, req: &ReplacePricingRequest) -> Result<PricingConfig, AppError> {
    let weekday_days = parse_day_list(&req.weekday_days).map_err(AppError::Validation)?;
    let weekend_days = parse_day_list(&req.weekend_days).map_err(AppError::Validation)?;

    if let Some(day) = weekday_days.iter().find(|d| weekend_days.contains(d)) {
        return Err(AppError::Validation(format!(
            "{day} cannot be both a weekday and a weekend day"
        )));
    }

    let mut seen = HashSet::new();
    let mut time_slots = Vec::with_capacity(req.time_slots.len());
    for input in &req.time_slots {
        let label = input.label.trim();
        if label.is_empty() {
            return Err(AppError::Validation("time slot label is required".to_string()));
        }
        if !seen.insert(label.to_string()) {
            return Err(AppError::Validation(format!("duplicate time slot label: {label}")));
        }
        for price in [input.weekday_price, input.weekend_price] {
            if !(0..=MAX_PRICE).contains(&price) {
                return Err(AppError::Validation(format!(
                    "price for {label} must be between 0 and {MAX_PRICE}, got {price}"
                )));
            }
        }
        time_slots.push(TimeSlot::new(label, input.weekday_price, input.weekend_price));
    }
    if time_slots.is_empty() {
        return Err(AppError::Validation("at least one time slot is required".to_string()));
    }

    queries::save_pricing(conn, &weekday_days, &weekend_days, &time_slots)?;
    tracing::info!(
        weekday_days = weekday_days.len(),
        weekend_days = weekend_days.len(),
        slots = time_slots.len(),
        "replaced pricing table"
    );

    Ok(PricingConfig {
        weekday_days,
        weekend_days,
        time_slots,
    })
}

fn repair(stored: &StoredPricing) -> (PricingConfig, bool) {
    let weekday_days = normalize_day_list(&stored.weekday_days);
    let weekend_days = normalize_day_list(&stored.weekend_days);

    let mut repaired = !same_names(&weekday_days, &stored.weekday_days)
        || !same_names(&weekend_days, &stored.weekend_days);

    let time_slots = if stored.time_slots.is_empty() {
        repaired = true;
        default_time_slots()
    } else {
        stored.time_slots.clone()
    };

    let config = PricingConfig {
        weekday_days,
        weekend_days,
        time_slots,
    };
    (config, repaired)
}

fn same_names(days: &[DayName], raw: &[String]) -> bool {
    days.len() == raw.len() && days.iter().zip(raw).all(|(d, r)| d.as_str() == r)
}
