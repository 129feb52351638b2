use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::day::parse_civil_date;
use crate::models::{BookRequest, Booking, DayName, Discount, NewBooking, PriceTier, PricingConfig, SlotState};

use super::pricing;
use super::resolver::{resolve_price, PriceQuote};

#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    pub slot: String,
    pub base_price: i64,
    pub effective_price: i64,
    pub applied_discount_percent: Option<u8>,
    pub booking_state: SlotState,
    /// The active booking, or the latest canceled one when the slot is free again.
    pub booking: Option<Booking>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub day_name: DayName,
    pub tier: PriceTier,
    pub is_past: bool,
    pub slots: Vec<SlotView>,
}

/// Pairs each priced slot with the ledger's view of it, in pricing-table order.
pub fn build_day(
    date: NaiveDate,
    today: NaiveDate,
    config: &PricingConfig,
    discounts: &[Discount],
    bookings: &[Booking],
) -> DaySchedule {
    let slots = config
        .time_slots
        .iter()
        .map(|slot| {
            let quote = resolve_price(date, &slot.label, config, discounts);
            let booking = slot_booking(bookings, &slot.label);
            let booking_state = match booking {
                Some(b) if b.is_active() => SlotState::Booked,
                Some(_) => SlotState::Canceled,
                None => SlotState::Available,
            };
            SlotView {
                slot: slot.label.clone(),
                base_price: quote.base_price,
                effective_price: quote.effective_price,
                applied_discount_percent: quote.applied_percent(),
                booking_state,
                booking: booking.cloned(),
            }
        })
        .collect();

    DaySchedule {
        date,
        day_name: DayName::of(date),
        tier: config.tier_of(date),
        is_past: date < today,
        slots,
    }
}

fn slot_booking<'a>(bookings: &'a [Booking], label: &str) -> Option<&'a Booking> {
    let mut latest_canceled: Option<&Booking> = None;
    for booking in bookings.iter().filter(|b| b.slot_label == label) {
        if booking.is_active() {
            return Some(booking);
        }
        if latest_canceled.map_or(true, |c| booking.canceled_at >= c.canceled_at) {
            latest_canceled = Some(booking);
        }
    }
    latest_canceled
}

pub fn list_slots_for_date(conn: &Connection, date: NaiveDate, today: NaiveDate) -> Result<DaySchedule, AppError> {
    let config = pricing::get_config(conn)?;
    let discounts = queries::list_discounts(conn)?;
    let bookings = queries::list_bookings_for_date(conn, date)?;
    Ok(build_day(date, today, &config, &discounts, &bookings))
}

pub fn quote(conn: &Connection, date: NaiveDate, slot_label: &str) -> Result<PriceQuote, AppError> {
    let config = pricing::get_config(conn)?;
    if config.slot(slot_label).is_none() {
        return Err(AppError::NotFound(format!("time slot {slot_label}")));
    }
    let discounts = queries::list_discounts(conn)?;
    Ok(resolve_price(date, slot_label, &config, &discounts))
}

/// Validates a booking request against the current pricing table. A missing
/// price is filled in with the slot's effective price for that day.
pub fn prepare_booking(conn: &Connection, req: &BookRequest) -> Result<NewBooking, AppError> {
    let date = match req.date.as_deref() {
        Some(s) => parse_civil_date(s).ok_or_else(|| AppError::Validation(format!("invalid date: {s}")))?,
        None => return Err(AppError::Validation("date is required".to_string())),
    };

    let slot_label = req.slot_label.as_deref().unwrap_or("").trim().to_string();
    if slot_label.is_empty() {
        return Err(AppError::Validation("slot_label is required".to_string()));
    }

    let customer_name = req.customer_name.as_deref().unwrap_or("").trim().to_string();
    if customer_name.is_empty() {
        return Err(AppError::Validation("customer_name is required".to_string()));
    }

    let config = pricing::get_config(conn)?;
    if config.slot(&slot_label).is_none() {
        return Err(AppError::Validation(format!("unknown time slot: {slot_label}")));
    }

    let price = match req.price {
        Some(p) if p < 0 => {
            return Err(AppError::Validation(format!("price must not be negative, got {p}")));
        }
        Some(p) => p,
        None => {
            let discounts = queries::list_discounts(conn)?;
            resolve_price(date, &slot_label, &config, &discounts).effective_price
        }
    };

    Ok(NewBooking {
        date,
        slot_label,
        customer_name,
        customer_phone: req.customer_phone.as_deref().unwrap_or("").trim().to_string(),
        reason: req.reason.as_deref().unwrap_or("").trim().to_string(),
        price,
    })
}
