pub mod account;
pub mod announcement;
pub mod booking;
pub mod coupon;
pub mod court;
pub mod overview;
pub mod payment;

pub use account::{Account, AccountUpsert, Role};
pub use announcement::{Announcement, NewAnnouncement};
pub use booking::{Booking, BookingStatus, NewBooking, MAX_SLOTS};
pub use coupon::{Coupon, NewCoupon};
pub use court::{Availability, Court, NewCourt};
pub use overview::AdminOverview;
pub use payment::Payment;

/// Sent with every request so the backend can reject clients with a stale schema.
pub const SCHEMA_VERSION: u32 = 1;

/// Checks run on every entity right after it is decoded from a response.
pub trait Validate {
    const ENTITY: &'static str;

    fn validate(&self) -> Result<(), String>;
}

pub(crate) fn require(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} is empty"))
    } else {
        Ok(())
    }
}
