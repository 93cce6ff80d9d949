//! Reservation model and status lifecycle

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::pricing::calculators::PricedSegment;

/// Reservation lifecycle status.
///
/// `blocked` is an admin-held slot with no customer; it occupies the court
/// for availability purposes just like a customer booking. `cancelled` and
/// `completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Blocked,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Blocked => "blocked",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Terminal statuses reject any further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    /// Cancelled reservations no longer occupy their slot
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

/// Payment status of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

/// A court occupied for a contiguous interval.
///
/// `starts_at`/`ends_at` are resolved local wall-clock instants with
/// midnight rollover already applied, so `ends_at` may fall on the day
/// after `booking_date`. The interval is half-open: `[starts_at, ends_at)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reservation {
    pub id: Uuid,
    pub court_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub booking_date: NaiveDate,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount_paid: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub total_price: Option<Decimal>,
    pub segments: serde_json::Value,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Parse the stored price breakdown into typed segments
    pub fn breakdown(&self) -> Vec<PricedSegment> {
        serde_json::from_value(self.segments.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
        assert!(!BookingStatus::Blocked.is_terminal());
    }

    #[test]
    fn test_only_cancelled_frees_the_slot() {
        assert!(!BookingStatus::Cancelled.occupies_slot());
        assert!(BookingStatus::Blocked.occupies_slot());
        assert!(BookingStatus::Pending.occupies_slot());
        assert!(BookingStatus::Completed.occupies_slot());
    }
}
