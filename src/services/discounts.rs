use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::day::{parse_civil_date, parse_day_list};
use crate::models::{CreateDiscountRequest, Discount, ALL_SLOTS};

use super::timestamp_now;

pub fn create(conn: &Connection, req: &CreateDiscountRequest, today: NaiveDate) -> Result<Discount, AppError> {
    let percent = req
        .percent
        .ok_or_else(|| AppError::Validation("percent is required".to_string()))?;
    let percent = u8::try_from(percent)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or_else(|| AppError::Validation(format!("percent must be between 0 and 100, got {percent}")))?;

    let until = match req.until.as_deref() {
        Some(s) => parse_civil_date(s)
            .ok_or_else(|| AppError::Validation(format!("invalid until date: {s}")))?,
        None => return Err(AppError::Validation("until is required".to_string())),
    };

    let created_at = match req.created_at.as_deref() {
        Some(s) => parse_civil_date(s)
            .ok_or_else(|| AppError::Validation(format!("invalid created_at date: {s}")))?,
        None => today,
    };

    if until < created_at {
        return Err(AppError::Validation(format!(
            "until ({until}) is before the discount starts ({created_at})"
        )));
    }

    let days = parse_day_list(&req.days).map_err(AppError::Validation)?;

    let mut slots: Vec<String> = Vec::new();
    for slot in req.slots.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !slots.iter().any(|s| s == slot) {
            slots.push(slot.to_string());
        }
    }
    if slots.is_empty() {
        slots.push(ALL_SLOTS.to_string());
    }

    let discount = Discount {
        id: uuid::Uuid::new_v4().to_string(),
        percent,
        until,
        created_at,
        reason: req.reason.as_deref().unwrap_or("").trim().to_string(),
        days,
        slots,
        recorded_at: timestamp_now(),
    };

    queries::insert_discount(conn, &discount)?;
    tracing::info!(discount_id = %discount.id, percent, %until, "created discount");
    Ok(discount)
}

pub fn list(conn: &Connection) -> Result<Vec<Discount>, AppError> {
    queries::list_discounts(conn)
}

pub fn delete(conn: &Connection, id: &str) -> Result<(), AppError> {
    if !queries::delete_discount(conn, id)? {
        return Err(AppError::NotFound(format!("discount {id}")));
    }
    tracing::info!(discount_id = id, "deleted discount");
    Ok(())
}
