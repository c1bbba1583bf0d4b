//! API endpoint handlers.

pub mod generate;
pub mod health;
