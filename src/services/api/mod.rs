//! Endpoint groups of the backend, one `impl ApiClient` block per resource.

mod announcements;
mod bookings;
mod client;
mod coupons;
mod courts;
mod payments;
mod users;

pub use client::ApiClient;
