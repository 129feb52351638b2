use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub date: NaiveDate,
    pub slot_label: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub reason: String,
    pub price: i64,
    pub booked_by: String,
    pub booked_at: NaiveDateTime,
    pub canceled_by: Option<String>,
    pub canceled_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingState {
    Active,
    Canceled,
}

impl Booking {
    pub fn state(&self) -> BookingState {
        if self.canceled_at.is_some() {
            BookingState::Canceled
        } else {
            BookingState::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == BookingState::Active
    }
}

/// What a slot looks like on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    Available,
    Booked,
    Canceled,
}

/// Customer-facing fields of a new booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub date: NaiveDate,
    pub slot_label: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub reason: String,
    pub price: i64,
}

// POST /api/bookings body
#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub date: Option<String>,
    pub slot_label: Option<String>,
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    /// Resolved from the pricing table when omitted.
    pub price: Option<i64>,
}

/// Sparse update. An absent field is left alone and an explicit `null` is a
/// write: it clears the nullable fields and blanks `customer_phone` and
/// `reason`. `null` for a required field is rejected by [`BookingPatch::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingPatch {
    #[serde(default, deserialize_with = "present")]
    pub customer_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub customer_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub reason: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub booked_by: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub booked_at: Option<Option<NaiveDateTime>>,
    #[serde(default, deserialize_with = "present")]
    pub canceled_by: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub canceled_at: Option<Option<NaiveDateTime>>,
}

impl BookingPatch {
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.customer_phone.is_none()
            && self.reason.is_none()
            && self.price.is_none()
            && self.booked_by.is_none()
            && self.booked_at.is_none()
            && self.canceled_by.is_none()
            && self.canceled_at.is_none()
    }

    /// Checks the values a stored booking cannot hold.
    pub fn validate(&self) -> Result<(), String> {
        let cleared = [
            ("customer_name", matches!(self.customer_name, Some(None))),
            ("price", matches!(self.price, Some(None))),
            ("booked_by", matches!(self.booked_by, Some(None))),
            ("booked_at", matches!(self.booked_at, Some(None))),
        ];
        if let Some((field, _)) = cleared.iter().find(|(_, is_null)| *is_null) {
            return Err(format!("{field} cannot be null"));
        }

        if let Some(Some(name)) = &self.customer_name {
            if name.trim().is_empty() {
                return Err("customer_name cannot be blank".to_string());
            }
        }
        if let Some(Some(price)) = self.price {
            if price < 0 {
                return Err(format!("price must not be negative, got {price}"));
            }
        }
        Ok(())
    }

    /// Writes the supplied fields. Required fields sent as `null` are skipped;
    /// call [`BookingPatch::validate`] first to reject them.
    pub fn apply(&self, booking: &mut Booking) {
        if let Some(Some(v)) = &self.customer_name {
            booking.customer_name = v.clone();
        }
        if let Some(v) = &self.customer_phone {
            booking.customer_phone = v.clone().unwrap_or_default();
        }
        if let Some(v) = &self.reason {
            booking.reason = v.clone().unwrap_or_default();
        }
        if let Some(Some(v)) = self.price {
            booking.price = v;
        }
        if let Some(Some(v)) = &self.booked_by {
            booking.booked_by = v.clone();
        }
        if let Some(Some(v)) = self.booked_at {
            booking.booked_at = v;
        }
        if let Some(v) = &self.canceled_by {
            booking.canceled_by = v.clone();
        }
        if let Some(v) = self.canceled_at {
            booking.canceled_at = v;
        }
    }
}

// Only called when the key is present, so `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
