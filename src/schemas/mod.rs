//! Request and response schemas for the HTTP surface

pub mod auth;
pub mod reservation;
