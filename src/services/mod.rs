pub mod api;
pub mod auth;
pub mod cache;
pub mod payment;
pub mod session;
pub mod token;
