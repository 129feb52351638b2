pub mod booking;
pub mod day;
pub mod discount;
pub mod pricing;
pub mod stats;

pub use booking::{BookRequest, Booking, BookingPatch, BookingState, NewBooking, SlotState};
pub use day::DayName;
pub use discount::{CreateDiscountRequest, Discount, ALL_SLOTS};
pub use pricing::{PriceTier, PricingConfig, ReplacePricingRequest, TimeSlot, TimeSlotInput};
pub use stats::{BookingStats, Dashboard, DayCount, SlotCount, StatsWindows};
