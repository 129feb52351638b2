use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};

use crate::errors::AppError;
use crate::models::{Booking, DayCount, DayName, Discount, SlotCount, TimeSlot};

type Result<T> = std::result::Result<T, AppError>;

// ── Pricing ──

/// The pricing row exactly as persisted, before any normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPricing {
    pub weekday_days: Vec<String>,
    pub weekend_days: Vec<String>,
    pub time_slots: Vec<TimeSlot>,
}

pub fn get_pricing(conn: &Connection) -> Result<Option<StoredPricing>> {
    let result = conn.query_row(
        "SELECT weekday_days, weekend_days, time_slots FROM pricing_config WHERE id = 1",
        [],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        },
    );

    match result {
        Ok((weekday_json, weekend_json, slots_json)) => Ok(Some(StoredPricing {
            weekday_days: serde_json::from_str(&weekday_json).unwrap_or_default(),
            weekend_days: serde_json::from_str(&weekend_json).unwrap_or_default(),
            time_slots: serde_json::from_str(&slots_json).unwrap_or_default(),
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn save_pricing(
    conn: &Connection,
    weekday_days: &[DayName],
    weekend_days: &[DayName],
    time_slots: &[TimeSlot],
) -> Result<()> {
    let weekday_json = serde_json::to_string(weekday_days)?;
    let weekend_json = serde_json::to_string(weekend_days)?;
    let slots_json = serde_json::to_string(time_slots)?;

    conn.execute(
        "INSERT INTO pricing_config (id, weekday_days, weekend_days, time_slots)
         VALUES (1, ?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
           weekday_days = excluded.weekday_days,
           weekend_days = excluded.weekend_days,
           time_slots = excluded.time_slots,
           updated_at = datetime('now')",
        params![weekday_json, weekend_json, slots_json],
    )?;
    Ok(())
}

// ── Discounts ──

const DISCOUNT_COLUMNS: &str = "id, percent, until, created_at, reason, days, slots, recorded_at";

pub fn insert_discount(conn: &Connection, discount: &Discount) -> Result<()> {
    let days_json = serde_json::to_string(&discount.days)?;
    let slots_json = serde_json::to_string(&discount.slots)?;

    conn.execute(
        "INSERT INTO discounts (id, percent, until, created_at, reason, days, slots, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            discount.id,
            discount.percent,
            discount.until,
            discount.created_at,
            discount.reason,
            days_json,
            slots_json,
            discount.recorded_at,
        ],
    )?;
    Ok(())
}

/// Newest first.
pub fn list_discounts(conn: &Connection) -> Result<Vec<Discount>> {
    let sql = format!("SELECT {DISCOUNT_COLUMNS} FROM discounts ORDER BY recorded_at DESC, rowid DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], parse_discount_row)?;

    let mut discounts = vec![];
    for row in rows {
        discounts.push(row?);
    }
    Ok(discounts)
}

/// Discounts whose window has not ended by `date`, highest percent first.
pub fn list_discounts_ending_on_or_after(conn: &Connection, date: NaiveDate) -> Result<Vec<Discount>> {
    let sql = format!(
        "SELECT {DISCOUNT_COLUMNS} FROM discounts WHERE until >= ?1 ORDER BY percent DESC, recorded_at DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![date], parse_discount_row)?;

    let mut discounts = vec![];
    for row in rows {
        discounts.push(row?);
    }
    Ok(discounts)
}

pub fn delete_discount(conn: &Connection, id: &str) -> Result<bool> {
    let count = conn.execute("DELETE FROM discounts WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_discount_row(row: &Row<'_>) -> rusqlite::Result<Discount> {
    let days_json: String = row.get(5)?;
    let slots_json: String = row.get(6)?;

    Ok(Discount {
        id: row.get(0)?,
        percent: row.get(1)?,
        until: row.get(2)?,
        created_at: row.get(3)?,
        reason: row.get(4)?,
        days: serde_json::from_str(&days_json).unwrap_or_default(),
        slots: serde_json::from_str(&slots_json).unwrap_or_default(),
        recorded_at: row.get(7)?,
    })
}

// ── Bookings ──

const BOOKING_COLUMNS: &str = "id, date, slot_label, customer_name, customer_phone, reason, price, \
     booked_by, booked_at, canceled_by, canceled_at, created_at, updated_at";

pub fn insert_booking(conn: &Connection, booking: &Booking) -> Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, date, slot_label, customer_name, customer_phone, reason, price,
                               booked_by, booked_at, canceled_by, canceled_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            booking.id,
            booking.date,
            booking.slot_label,
            booking.customer_name,
            booking.customer_phone,
            booking.reason,
            booking.price,
            booking.booked_by,
            booking.booked_at,
            booking.canceled_by,
            booking.canceled_at,
            booking.created_at,
            booking.updated_at,
        ],
    )?;
    Ok(())
}

/// Writes every mutable column of an existing record. Identity, date and slot never change.
pub fn update_booking(conn: &Connection, booking: &Booking) -> Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET
           customer_name = ?2,
           customer_phone = ?3,
           reason = ?4,
           price = ?5,
           booked_by = ?6,
           booked_at = ?7,
           canceled_by = ?8,
           canceled_at = ?9,
           updated_at = ?10
         WHERE id = ?1",
        params![
            booking.id,
            booking.customer_name,
            booking.customer_phone,
            booking.reason,
            booking.price,
            booking.booked_by,
            booking.booked_at,
            booking.canceled_by,
            booking.canceled_at,
            booking.updated_at,
        ],
    )?;
    Ok(count > 0)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> Result<Option<Booking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], parse_booking_row);

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_active_booking(conn: &Connection, date: NaiveDate, slot_label: &str) -> Result<Option<Booking>> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE date = ?1 AND slot_label = ?2 AND canceled_at IS NULL"
    );
    let result = conn.query_row(&sql, params![date, slot_label], parse_booking_row);

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// The most recently canceled record for a key, the only one eligible for revival.
pub fn find_latest_canceled_booking(
    conn: &Connection,
    date: NaiveDate,
    slot_label: &str,
) -> Result<Option<Booking>> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE date = ?1 AND slot_label = ?2 AND canceled_at IS NOT NULL
         ORDER BY canceled_at DESC, rowid DESC LIMIT 1"
    );
    let result = conn.query_row(&sql, params![date, slot_label], parse_booking_row);

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Active and canceled records for a day in creation order.
pub fn list_bookings_for_date(conn: &Connection, date: NaiveDate) -> Result<Vec<Booking>> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE date = ?1 ORDER BY created_at ASC, rowid ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![date], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

pub fn list_active_bookings_for_date(conn: &Connection, date: NaiveDate) -> Result<Vec<Booking>> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE date = ?1 AND canceled_at IS NULL ORDER BY slot_label ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![date], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

fn parse_booking_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        date: row.get(1)?,
        slot_label: row.get(2)?,
        customer_name: row.get(3)?,
        customer_phone: row.get(4)?,
        reason: row.get(5)?,
        price: row.get(6)?,
        booked_by: row.get(7)?,
        booked_at: row.get::<_, NaiveDateTime>(8)?,
        canceled_by: row.get(9)?,
        canceled_at: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

// ── Statistics ──

/// Active bookings per slot in `[start, end]`, sorted by count.
pub fn slot_booking_counts(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
    most_first: bool,
    limit: i64,
) -> Result<Vec<SlotCount>> {
    let order = if most_first { "DESC" } else { "ASC" };
    let sql = format!(
        "SELECT slot_label, COUNT(*) AS total FROM bookings
         WHERE date >= ?1 AND date <= ?2 AND canceled_at IS NULL
         GROUP BY slot_label
         ORDER BY total {order}, slot_label ASC
         LIMIT ?3"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![start, end, limit], |row| {
        Ok(SlotCount {
            slot_label: row.get(0)?,
            total_bookings: row.get(1)?,
        })
    })?;

    let mut counts = vec![];
    for row in rows {
        counts.push(row?);
    }
    Ok(counts)
}

/// Active bookings per day of week in `[start, end]`, sorted by count.
pub fn day_booking_counts(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
    most_first: bool,
    limit: i64,
) -> Result<Vec<DayCount>> {
    let order = if most_first { "DESC" } else { "ASC" };
    let sql = format!(
        "SELECT CAST(strftime('%w', date) AS INTEGER) AS dow, COUNT(*) AS total FROM bookings
         WHERE date >= ?1 AND date <= ?2 AND canceled_at IS NULL
         GROUP BY dow
         ORDER BY total {order}, dow ASC
         LIMIT ?3"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![start, end, limit], |row| {
        Ok((row.get::<_, u32>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = vec![];
    for row in rows {
        let (dow, total_bookings) = row?;
        if let Some(day) = DayName::from_index(dow) {
            counts.push(DayCount { day, total_bookings });
        }
    }
    Ok(counts)
}
