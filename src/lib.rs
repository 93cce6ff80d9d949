//! CricNets booking backend.
//!
//! Customers reserve time slots on cricket-net courts; administrators
//! manage courts and the time-based rate table. Pricing decomposes a
//! requested range into hour-bounded segments priced by day-of-week and
//! time-of-day; availability enforces half-open interval exclusivity per
//! court, backed by a database exclusion constraint.

pub mod booking;
pub mod cache;
pub mod error;
pub mod models;
pub mod pricing;

use sqlx::PgPool;

use cache::AppCache;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
}
