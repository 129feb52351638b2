use chrono::{Days, NaiveDate};
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{BookingStats, Dashboard, StatsWindows};

const MOST_BOOKED_LIMIT: i64 = 5;
const LEAST_BOOKED_LIMIT: i64 = 3;
const BUSIEST_DAYS_LIMIT: i64 = 3;
const QUIET_DAYS_LIMIT: i64 = 2;

/// Active-booking statistics for `[start, end]`.
pub fn booking_stats(conn: &Connection, start: NaiveDate, end: NaiveDate) -> Result<BookingStats, AppError> {
    Ok(BookingStats {
        most_booked_slots: queries::slot_booking_counts(conn, start, end, true, MOST_BOOKED_LIMIT)?,
        least_booked_slots: queries::slot_booking_counts(conn, start, end, false, LEAST_BOOKED_LIMIT)?,
        busiest_days: queries::day_booking_counts(conn, start, end, true, BUSIEST_DAYS_LIMIT)?,
        quiet_days: queries::day_booking_counts(conn, start, end, false, QUIET_DAYS_LIMIT)?,
    })
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

pub fn dashboard(conn: &Connection, today: NaiveDate) -> Result<Dashboard, AppError> {
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);

    let stats = StatsWindows {
        last_week: booking_stats(conn, days_before(today, 7), today)?,
        last_month: booking_stats(conn, days_before(today, 30), today)?,
        last_year: booking_stats(conn, days_before(today, 365), today)?,
    };

    Ok(Dashboard {
        stats,
        today_bookings: queries::list_active_bookings_for_date(conn, today)?,
        tomorrow_bookings: queries::list_active_bookings_for_date(conn, tomorrow)?,
        discounts: queries::list_discounts_ending_on_or_after(conn, today)?,
    })
}
