//! Booking module.
//!
//! Availability checking and the booking-creation workflow over the
//! reservation store.

pub mod availability;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use availability::{check_availability, overlaps, resolve_slot, Availability, SlotRange};
pub use routes::router;
