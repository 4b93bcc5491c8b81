use reqwest::Method;
use serde_json::json;

use super::client::{ensure_deleted, inserted_id};
use super::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::models::{Booking, BookingStatus, NewBooking};
use crate::services::cache::QueryKey;

impl ApiClient {
    /// `GET /bookings?email=`, every booking the user holds.
    pub async fn bookings_for(&self, email: &str) -> AppResult<Vec<Booking>> {
        let mut url = self.endpoint(&["bookings"]);
        url.query_pairs_mut().append_pair("email", email);
        self.cached_list(QueryKey::new("bookings", format!("email={email}")), url)
            .await
    }

    /// `GET /bookings/pending`
    pub async fn pending_bookings(&self) -> AppResult<Vec<Booking>> {
        self.cached_list(
            QueryKey::new("bookings", "pending"),
            self.endpoint(&["bookings", "pending"]),
        )
        .await
    }

    /// `GET /bookings/approved/:email`
    pub async fn approved_bookings(&self, email: &str) -> AppResult<Vec<Booking>> {
        self.cached_list(
            QueryKey::new("bookings", format!("approved={email}")),
            self.endpoint(&["bookings", "approved", email]),
        )
        .await
    }

    /// `GET /bookings/:id`, always from the backend.
    pub async fn booking(&self, id: &str) -> AppResult<Booking> {
        self.fetch_one(self.endpoint(&["bookings", id])).await
    }

    /// `POST /bookings`. The returned booking carries the server-assigned id.
    pub async fn create_booking(&self, booking: &NewBooking) -> AppResult<Booking> {
        let ack = self
            .write(
                Method::POST,
                self.endpoint(&["bookings"]),
                Some(booking),
                &["bookings"],
            )
            .await?;
        let id = inserted_id(&ack).ok_or_else(|| AppError::Decode {
            entity: "booking",
            message: "response carried no inserted id".to_string(),
        })?;
        Ok(Booking {
            id,
            court_id: booking.court_id.clone(),
            date: booking.date,
            slots: booking.slots,
            total_price: booking.total_price,
            user_id: booking.user_id.clone(),
            user_email: booking.user_email.clone(),
            status: booking.status,
            paid: false,
        })
    }

    /// `PATCH /bookings/:id` with `{status}`.
    pub async fn set_booking_status(&self, id: &str, status: BookingStatus) -> AppResult<()> {
        self.write(
            Method::PATCH,
            self.endpoint(&["bookings", id]),
            Some(&json!({ "status": status })),
            &["bookings"],
        )
        .await?;
        Ok(())
    }

    /// `DELETE /bookings/:id`
    pub async fn delete_booking(&self, id: &str) -> AppResult<()> {
        let ack = self
            .write::<()>(
                Method::DELETE,
                self.endpoint(&["bookings", id]),
                None,
                &["bookings"],
            )
            .await?;
        ensure_deleted(&ack, "booking")
    }
}
