//! Database models

mod reservation;

pub use reservation::{NewReservation, Reservation, TimeSlot};
