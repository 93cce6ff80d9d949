//! Response DTOs for booking API endpoints.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{BookingStatus, PaymentStatus, Reservation};
use crate::pricing::calculators::PricedSegment;

/// A persisted reservation with its parsed price breakdown
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
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
    pub breakdown: Vec<PricedSegment>,
    pub notes: Option<String>,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        let breakdown = r.breakdown();
        Self {
            id: r.id,
            court_id: r.court_id,
            customer_id: r.customer_id,
            booking_date: r.booking_date,
            starts_at: r.starts_at,
            ends_at: r.ends_at,
            status: r.status,
            payment_status: r.payment_status,
            amount_paid: r.amount_paid,
            discount: r.discount,
            total_price: r.total_price,
            breakdown,
            notes: r.notes,
        }
    }
}

/// Result of an availability query
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ReservationResponse>,
}
