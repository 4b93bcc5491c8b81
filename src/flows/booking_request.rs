use chrono::{Local, NaiveDate};

use crate::errors::{AppError, AppResult, FieldErrors};
use crate::models::{Booking, BookingStatus, Court, NewBooking, MAX_SLOTS};
use crate::services::api::ApiClient;
use crate::services::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Closed,
    Open,
    Validating,
    Submitting,
}

/// The "book this court" modal: collects a date and slot count, checks them
/// locally and submits a pending booking.
pub struct BookingRequest {
    state: RequestState,
    user_id: String,
    user_email: String,
    known: Vec<Booking>,
    court: Option<Court>,
    date: Option<NaiveDate>,
    slots: u32,
    errors: FieldErrors,
    server_error: Option<String>,
}

impl BookingRequest {
    /// Fetches the user's existing bookings once, for the duplicate check.
    pub async fn mount(api: &ApiClient, session: &Session) -> AppResult<Self> {
        let known = api.bookings_for(&session.email).await?;
        Ok(Self::with_known_bookings(session, known))
    }

    pub fn with_known_bookings(session: &Session, known: Vec<Booking>) -> Self {
        Self {
            state: RequestState::Closed,
            user_id: session.uid.clone(),
            user_email: session.email.clone(),
            known,
            court: None,
            date: None,
            slots: 1,
            errors: FieldErrors::new(),
            server_error: None,
        }
    }

    pub fn open(&mut self, court: Court) {
        self.court = Some(court);
        self.date = None;
        self.slots = 1;
        self.errors = FieldErrors::new();
        self.server_error = None;
        self.state = RequestState::Open;
    }

    pub fn close(&mut self) {
        self.court = None;
        self.state = RequestState::Closed;
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    pub fn set_slots(&mut self, slots: u32) {
        self.slots = slots;
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn court(&self) -> Option<&Court> {
        self.court.as_ref()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn server_error(&self) -> Option<&str> {
        self.server_error.as_deref()
    }

    pub fn known_bookings(&self) -> &[Booking] {
        &self.known
    }

    /// Price shown next to the slot picker.
    pub fn quoted_price(&self) -> Option<f64> {
        self.court.as_ref().map(|c| c.total_price(self.slots))
    }

    /// Date and slot checks; each field gets its own message.
    pub fn validate(&self, today: NaiveDate) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        match self.date {
            None => errors.push("date", "Please select a date"),
            Some(date) if date < today => errors.push("date", "Booking date cannot be in the past"),
            Some(_) => {}
        }

        if self.slots < 1 || self.slots > MAX_SLOTS {
            errors.push("slots", format!("Slots must be between 1 and {MAX_SLOTS}"));
        } else if let Some(court) = &self.court {
            let cap = court.availability.slot_cap();
            if self.slots > cap {
                errors.push("slots", format!("Only {cap} slots are available for this court"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn check_duplicate(&self, court_id: &str, date: NaiveDate) -> Result<(), FieldErrors> {
        if self.known.iter().any(|b| b.conflicts_with(court_id, date)) {
            return Err(FieldErrors::single(
                "form",
                format!("You already have a booking for this court on {date}"),
            ));
        }
        Ok(())
    }

    pub async fn submit(&mut self, api: &ApiClient) -> AppResult<Booking> {
        self.submit_on(api, Local::now().date_naive()).await
    }

    /// Validates against `today`, then posts the booking. Nothing is sent
    /// unless every local check passes.
    pub async fn submit_on(&mut self, api: &ApiClient, today: NaiveDate) -> AppResult<Booking> {
        let (court_id, rate) = match (&self.state, &self.court) {
            (RequestState::Open, Some(court)) => (court.id.clone(), court.rate),
            _ => {
                return Err(AppError::Validation(FieldErrors::single(
                    "form",
                    "Select a court before booking",
                )))
            }
        };

        self.state = RequestState::Validating;
        self.errors = FieldErrors::new();
        self.server_error = None;

        let checked = self.validate(today).and_then(|()| {
            let date = self.date.unwrap_or(today);
            self.check_duplicate(&court_id, date).map(|()| date)
        });
        let date = match checked {
            Ok(date) => date,
            Err(errors) => {
                self.errors = errors.clone();
                self.state = RequestState::Open;
                return Err(AppError::Validation(errors));
            }
        };

        let payload = NewBooking {
            court_id,
            date,
            slots: self.slots,
            total_price: rate * f64::from(self.slots),
            user_id: self.user_id.clone(),
            user_email: self.user_email.clone(),
            status: BookingStatus::Pending,
        };

        self.state = RequestState::Submitting;
        match api.create_booking(&payload).await {
            Ok(booking) => {
                tracing::info!(
                    booking_id = %booking.id,
                    court_id = %booking.court_id,
                    date = %booking.date,
                    slots = booking.slots,
                    "booking request submitted"
                );
                self.known.push(booking.clone());
                self.close();
                Ok(booking)
            }
            Err(e) => {
                tracing::error!(error = %e, "booking request failed");
                self.server_error = Some(e.user_message());
                self.state = RequestState::Open;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Availability;

    fn session() -> Session {
        Session {
            uid: "u1".into(),
            email: "ana@example.com".into(),
            display_name: None,
            photo_url: None,
            id_token: "t".into(),
        }
    }

    fn court(availability: u32) -> Court {
        Court {
            id: "c1".into(),
            name: "Center Court".into(),
            kind: "Tennis".into(),
            location: "North".into(),
            rate: 500.0,
            capacity: 4,
            availability: Availability::Slots(availability),
            description: String::new(),
            amenities: Default::default(),
            image: String::new(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_open_resets_form() {
        let mut flow = BookingRequest::with_known_bookings(&session(), vec![]);
        flow.open(court(5));
        flow.set_date(day("2099-01-01"));
        flow.set_slots(4);
        flow.open(court(5));
        assert_eq!(flow.state(), RequestState::Open);
        assert_eq!(flow.slots, 1);
        assert!(flow.date.is_none());
        assert!(flow.errors().is_empty());
    }

    #[test]
    fn test_slot_bounds() {
        let today = day("2026-01-01");
        let mut flow = BookingRequest::with_known_bookings(&session(), vec![]);
        flow.open(court(5));
        flow.set_date(day("2026-01-02"));

        for bad in [0, 6, 9] {
            flow.set_slots(bad);
            let errors = flow.validate(today).unwrap_err();
            assert!(errors.get("slots").is_some(), "slots={bad} should fail");
            assert!(errors.get("date").is_none());
        }
        flow.set_slots(5);
        assert!(flow.validate(today).is_ok());
    }

    #[test]
    fn test_date_and_slot_errors_are_independent() {
        let mut flow = BookingRequest::with_known_bookings(&session(), vec![]);
        flow.open(court(5));
        flow.set_date(day("2025-12-31"));
        flow.set_slots(0);
        let errors = flow.validate(day("2026-01-01")).unwrap_err();
        assert_eq!(errors.get("date"), Some("Booking date cannot be in the past"));
        assert!(errors.get("slots").is_some());
    }

    #[test]
    fn test_today_is_bookable() {
        let mut flow = BookingRequest::with_known_bookings(&session(), vec![]);
        flow.open(court(5));
        flow.set_date(day("2026-01-01"));
        assert!(flow.validate(day("2026-01-01")).is_ok());
    }

    #[test]
    fn test_missing_date() {
        let mut flow = BookingRequest::with_known_bookings(&session(), vec![]);
        flow.open(court(5));
        let errors = flow.validate(day("2026-01-01")).unwrap_err();
        assert_eq!(errors.get("date"), Some("Please select a date"));
    }

    #[test]
    fn test_quoted_price_follows_slots() {
        let mut flow = BookingRequest::with_known_bookings(&session(), vec![]);
        assert!(flow.quoted_price().is_none());
        flow.open(court(5));
        flow.set_slots(3);
        assert_eq!(flow.quoted_price(), Some(1500.0));
    }

    #[test]
    fn test_duplicate_ignores_cancelled() {
        let existing = |status| Booking {
            id: "b0".into(),
            court_id: "c1".into(),
            date: day("2099-01-01"),
            slots: 1,
            total_price: 500.0,
            user_id: "u1".into(),
            user_email: "ana@example.com".into(),
            status,
            paid: false,
        };
        let flow =
            BookingRequest::with_known_bookings(&session(), vec![existing(BookingStatus::Cancelled)]);
        assert!(flow.check_duplicate("c1", day("2099-01-01")).is_ok());

        let flow =
            BookingRequest::with_known_bookings(&session(), vec![existing(BookingStatus::Approved)]);
        let errors = flow.check_duplicate("c1", day("2099-01-01")).unwrap_err();
        assert!(errors.get("form").is_some());
        assert!(flow.check_duplicate("c1", day("2099-01-02")).is_ok());
    }
}
