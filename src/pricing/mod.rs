//! Pricing engine module.
//!
//! Pure per-segment price calculation plus the stored rate table and its
//! administration endpoints.

pub mod calculators;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{compute_price, DayType, PriceQuote, PricedSegment, PricingError, RateTable, TimeSlot};
pub use routes::router;
