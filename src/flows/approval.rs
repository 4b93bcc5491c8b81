use crate::errors::{AppError, AppResult, FieldErrors};
use crate::flows::court_name;
use crate::flows::pagination::{rows_for_width, Paginator};
use crate::models::{Booking, BookingStatus, Court};
use crate::services::api::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// An approve or reject the admin has asked for but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDecision {
    pub booking_id: String,
    pub decision: Decision,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApprovalRow<'a> {
    pub booking: &'a Booking,
    pub court_name: &'a str,
}

/// Admin view of booking requests still waiting for a decision.
///
/// The list is a local cache of "still pending": decided rows are removed
/// on success and kept on failure. `reload` reconciles with the backend.
pub struct ApprovalQueue {
    pending: Vec<Booking>,
    courts: Vec<Court>,
    pager: Paginator,
    awaiting: Option<PendingDecision>,
}

impl ApprovalQueue {
    pub async fn mount(api: &ApiClient, viewport_width: u32) -> AppResult<Self> {
        let (pending, courts) = tokio::try_join!(api.pending_bookings(), api.courts())?;
        Ok(Self::from_parts(pending, courts, viewport_width))
    }

    pub fn from_parts(pending: Vec<Booking>, courts: Vec<Court>, viewport_width: u32) -> Self {
        Self {
            pending,
            courts,
            pager: Paginator::new(rows_for_width(viewport_width)),
            awaiting: None,
        }
    }

    pub async fn reload(&mut self, api: &ApiClient) -> AppResult<()> {
        api.cache().invalidate("bookings");
        self.pending = api.pending_bookings().await?;
        self.pager.clamp(self.pending.len());
        Ok(())
    }

    pub fn resize(&mut self, viewport_width: u32) {
        self.pager
            .set_page_size(rows_for_width(viewport_width), self.pending.len());
    }

    pub fn pending(&self) -> &[Booking] {
        &self.pending
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn page_size(&self) -> usize {
        self.pager.page_size()
    }

    pub fn page_count(&self) -> usize {
        self.pager.page_count(self.pending.len())
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.pager.go_to(page, self.pending.len())
    }

    pub fn rows(&self) -> Vec<ApprovalRow<'_>> {
        self.pager
            .slice(&self.pending)
            .iter()
            .map(|booking| ApprovalRow {
                booking,
                court_name: court_name(&self.courts, &booking.court_id),
            })
            .collect()
    }

    pub fn request_approve(&mut self, booking_id: &str) -> AppResult<&PendingDecision> {
        self.request(booking_id, Decision::Approve)
    }

    pub fn request_reject(&mut self, booking_id: &str) -> AppResult<&PendingDecision> {
        self.request(booking_id, Decision::Reject)
    }

    fn request(&mut self, booking_id: &str, decision: Decision) -> AppResult<&PendingDecision> {
        if !self.pending.iter().any(|b| b.id == booking_id) {
            return Err(AppError::NotFound(format!("pending booking {booking_id}")));
        }
        Ok(&*self.awaiting.insert(PendingDecision {
            booking_id: booking_id.to_string(),
            decision,
        }))
    }

    pub fn awaiting(&self) -> Option<&PendingDecision> {
        self.awaiting.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.awaiting = None;
    }

    /// Carries out the confirmed decision. Approve patches the status;
    /// reject deletes the request outright.
    pub async fn confirm(&mut self, api: &ApiClient) -> AppResult<PendingDecision> {
        let pending = self.awaiting.take().ok_or_else(|| {
            AppError::Validation(FieldErrors::single("form", "Nothing to confirm"))
        })?;

        let result = match pending.decision {
            Decision::Approve => {
                api.set_booking_status(&pending.booking_id, BookingStatus::Approved)
                    .await
            }
            Decision::Reject => api.delete_booking(&pending.booking_id).await,
        };

        match result {
            Ok(()) => {
                tracing::info!(
                    booking_id = %pending.booking_id,
                    decision = ?pending.decision,
                    "booking request decided"
                );
                self.pending.retain(|b| b.id != pending.booking_id);
                self.pager.clamp(self.pending.len());
                Ok(pending)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    booking_id = %pending.booking_id,
                    decision = ?pending.decision,
                    "booking decision failed"
                );
                Err(e)
            }
        }
    }
}
