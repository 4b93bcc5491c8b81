//! Client-side booking workflow: each flow holds a disposable copy of the
//! backend state it needs and the local rules applied before any write.

pub mod access;
pub mod approval;
pub mod booking_request;
pub mod catalog;
pub mod checkout;
pub mod confirmation;
pub mod manage;
pub mod pagination;

use crate::models::Court;

pub const UNKNOWN_COURT: &str = "Unknown Court";

/// Local join from a booking's court id to a display name.
pub fn court_name<'a>(courts: &'a [Court], court_id: &str) -> &'a str {
    courts
        .iter()
        .find(|c| c.id == court_id)
        .map(|c| c.name.as_str())
        .unwrap_or(UNKNOWN_COURT)
}
