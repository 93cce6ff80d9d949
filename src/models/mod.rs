//! Domain models

pub mod court;
pub mod customer;
pub mod reservation;

pub use court::Court;
pub use customer::Customer;
pub use reservation::{BookingStatus, PaymentStatus, Reservation};
