use chrono::NaiveDate;
use rusqlite::{Connection, TransactionBehavior};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingPatch, NewBooking};

use super::timestamp_now;

fn ensure_not_past(date: NaiveDate, today: NaiveDate, action: &str) -> Result<(), AppError> {
    if date < today {
        return Err(AppError::PastDate(format!(
            "cannot {action} on a past date ({date})"
        )));
    }
    Ok(())
}

/// Books a slot. A canceled record for the same date and slot is revived in
/// place; otherwise a new record is inserted. The active-booking check and
/// the write share one immediate transaction.
pub fn book(
    conn: &mut Connection,
    new: NewBooking,
    admin: &str,
    today: NaiveDate,
) -> Result<Booking, AppError> {
    ensure_not_past(new.date, today, "book")?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if queries::find_active_booking(&tx, new.date, &new.slot_label)?.is_some() {
        return Err(AppError::Conflict(format!(
            "slot {} on {} is already booked",
            new.slot_label, new.date
        )));
    }

    let now = timestamp_now();
    let booking = match queries::find_latest_canceled_booking(&tx, new.date, &new.slot_label)? {
        Some(mut revived) => {
            revived.customer_name = new.customer_name;
            revived.customer_phone = new.customer_phone;
            revived.reason = new.reason;
            revived.price = new.price;
            revived.booked_by = admin.to_string();
            revived.booked_at = now;
            revived.canceled_by = None;
            revived.canceled_at = None;
            revived.updated_at = now;
            queries::update_booking(&tx, &revived)?;
            tracing::info!(booking_id = %revived.id, date = %revived.date, slot = %revived.slot_label, admin, "revived canceled booking");
            revived
        }
        None => {
            let booking = Booking {
                id: uuid::Uuid::new_v4().to_string(),
                date: new.date,
                slot_label: new.slot_label,
                customer_name: new.customer_name,
                customer_phone: new.customer_phone,
                reason: new.reason,
                price: new.price,
                booked_by: admin.to_string(),
                booked_at: now,
                canceled_by: None,
                canceled_at: None,
                created_at: now,
                updated_at: now,
            };
            queries::insert_booking(&tx, &booking)?;
            tracing::info!(booking_id = %booking.id, date = %booking.date, slot = %booking.slot_label, admin, "created booking");
            booking
        }
    };

    tx.commit()?;
    Ok(booking)
}

/// Marks an active booking canceled. Customer and price data are kept.
pub fn cancel(
    conn: &mut Connection,
    booking_id: &str,
    admin: &str,
    today: NaiveDate,
) -> Result<Booking, AppError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut booking = queries::get_booking_by_id(&tx, booking_id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;

    ensure_not_past(booking.date, today, "cancel")?;

    if !booking.is_active() {
        return Err(AppError::Conflict(format!(
            "booking {booking_id} is already canceled"
        )));
    }

    let now = timestamp_now();
    booking.canceled_by = Some(admin.to_string());
    booking.canceled_at = Some(now);
    booking.updated_at = now;
    queries::update_booking(&tx, &booking)?;

    tx.commit()?;
    tracing::info!(booking_id, date = %booking.date, slot = %booking.slot_label, admin, "canceled booking");
    Ok(booking)
}

/// Applies a sparse patch. Clearing the cancellation of a record whose slot
/// has since been rebooked violates the active-slot index and is a conflict.
pub fn update(conn: &mut Connection, booking_id: &str, patch: &BookingPatch) -> Result<Booking, AppError> {
    patch.validate().map_err(AppError::Validation)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut booking = queries::get_booking_by_id(&tx, booking_id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;

    if patch.is_empty() {
        return Ok(booking);
    }

    patch.apply(&mut booking);
    booking.updated_at = timestamp_now();
    queries::update_booking(&tx, &booking)?;

    tx.commit()?;
    tracing::info!(booking_id, "updated booking");
    Ok(booking)
}

pub fn list_for_date(conn: &Connection, date: NaiveDate) -> Result<Vec<Booking>, AppError> {
    queries::list_bookings_for_date(conn, date)
}
