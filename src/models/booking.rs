use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{require, Validate};

/// Upper bound on slots per booking, regardless of court availability.
pub const MAX_SLOTS: u32 = 8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(alias = "_id")]
    pub id: String,
    pub court_id: String,
    pub date: NaiveDate,
    pub slots: u32,
    pub total_price: f64,
    #[serde(default)]
    pub user_id: String,
    pub user_email: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub paid: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    #[serde(alias = "confirmed")]
    Paid,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Paid => "paid",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Booking {
    /// True when this booking still occupies its court on its date.
    pub fn is_active(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }

    pub fn conflicts_with(&self, court_id: &str, date: NaiveDate) -> bool {
        self.is_active() && self.court_id == court_id && self.date == date
    }
}

impl Validate for Booking {
    const ENTITY: &'static str = "booking";

    fn validate(&self) -> Result<(), String> {
        require(&self.id, "id")?;
        require(&self.court_id, "courtId")?;
        if self.slots == 0 || self.slots > MAX_SLOTS {
            return Err(format!("slots {} outside 1..={MAX_SLOTS}", self.slots));
        }
        if !self.total_price.is_finite() || self.total_price < 0.0 {
            return Err(format!("totalPrice {} is not a valid price", self.total_price));
        }
        Ok(())
    }
}

/// Body for `POST /bookings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub court_id: String,
    pub date: NaiveDate,
    pub slots: u32,
    pub total_price: f64,
    pub user_id: String,
    pub user_email: String,
    pub status: BookingStatus,
}
