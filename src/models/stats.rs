use serde::Serialize;

use super::booking::Booking;
use super::day::DayName;
use super::discount::Discount;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SlotCount {
    pub slot_label: String,
    pub total_bookings: i64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DayCount {
    pub day: DayName,
    pub total_bookings: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct BookingStats {
    pub most_booked_slots: Vec<SlotCount>,
    pub least_booked_slots: Vec<SlotCount>,
    pub busiest_days: Vec<DayCount>,
    pub quiet_days: Vec<DayCount>,
}

#[derive(Clone, Debug, Serialize)]
pub struct StatsWindows {
    pub last_week: BookingStats,
    pub last_month: BookingStats,
    pub last_year: BookingStats,
}

#[derive(Clone, Debug, Serialize)]
pub struct Dashboard {
    pub stats: StatsWindows,
    pub today_bookings: Vec<Booking>,
    pub tomorrow_bookings: Vec<Booking>,
    pub discounts: Vec<Discount>,
}
