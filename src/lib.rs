pub mod config;
pub mod errors;
pub mod flows;
pub mod models;
pub mod services;
pub mod state;
