use crate::errors::{AppError, AppResult, FieldErrors};
use crate::flows::access::Route;
use crate::flows::UNKNOWN_COURT;
use crate::models::{Booking, BookingStatus, Court};
use crate::services::api::ApiClient;
use crate::services::session::Session;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberRow<'a> {
    pub booking: &'a Booking,
    pub court_name: &'a str,
    pub location: &'a str,
    pub image: &'a str,
}

/// A member's approved, not yet paid bookings.
pub struct MemberBookings {
    email: String,
    approved: Vec<Booking>,
    courts: Vec<Court>,
    awaiting_cancel: Option<String>,
}

impl MemberBookings {
    pub async fn mount(api: &ApiClient, session: &Session) -> AppResult<Self> {
        let (approved, courts) =
            tokio::try_join!(api.approved_bookings(&session.email), api.courts())?;
        Ok(Self::from_parts(&session.email, approved, courts))
    }

    pub fn from_parts(email: &str, approved: Vec<Booking>, courts: Vec<Court>) -> Self {
        Self {
            email: email.to_string(),
            approved,
            courts,
            awaiting_cancel: None,
        }
    }

    pub async fn reload(&mut self, api: &ApiClient) -> AppResult<()> {
        api.cache().invalidate("bookings");
        self.approved = api.approved_bookings(&self.email).await?;
        Ok(())
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.approved
    }

    pub fn rows(&self) -> Vec<MemberRow<'_>> {
        self.approved
            .iter()
            .map(|booking| {
                let court = self.courts.iter().find(|c| c.id == booking.court_id);
                MemberRow {
                    booking,
                    court_name: court.map_or(UNKNOWN_COURT, |c| c.name.as_str()),
                    location: court.map_or("", |c| c.location.as_str()),
                    image: court.map_or("", |c| c.image.as_str()),
                }
            })
            .collect()
    }

    fn find(&self, booking_id: &str) -> AppResult<&Booking> {
        self.approved
            .iter()
            .find(|b| b.id == booking_id)
            .ok_or_else(|| AppError::NotFound(format!("approved booking {booking_id}")))
    }

    /// Cancellation is only offered until the booking is paid.
    pub fn request_cancel(&mut self, booking_id: &str) -> AppResult<()> {
        let booking = self.find(booking_id)?;
        if booking.paid || booking.status != BookingStatus::Approved {
            return Err(AppError::Validation(FieldErrors::single(
                "form",
                "Only approved, unpaid bookings can be cancelled",
            )));
        }
        self.awaiting_cancel = Some(booking_id.to_string());
        Ok(())
    }

    pub fn awaiting_cancel(&self) -> Option<&str> {
        self.awaiting_cancel.as_deref()
    }

    pub fn dismiss(&mut self) {
        self.awaiting_cancel = None;
    }

    pub async fn confirm_cancel(&mut self, api: &ApiClient) -> AppResult<String> {
        let booking_id = self.awaiting_cancel.take().ok_or_else(|| {
            AppError::Validation(FieldErrors::single("form", "Nothing to confirm"))
        })?;
        if let Err(e) = api.delete_booking(&booking_id).await {
            tracing::error!(error = %e, booking_id = %booking_id, "cancellation failed");
            return Err(e);
        }
        tracing::info!(booking_id = %booking_id, "booking cancelled by member");
        self.approved.retain(|b| b.id != booking_id);
        Ok(booking_id)
    }

    pub fn proceed_to_payment(&self, booking_id: &str) -> AppResult<Route> {
        let booking = self.find(booking_id)?;
        Ok(Route::Payment(booking.id.clone()))
    }
}
