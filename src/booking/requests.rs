//! Request DTOs for booking API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{BookingStatus, PaymentStatus};

/// Customer booking request
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub court_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub customer_phone: String,
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Administrative booking request.
///
/// With `blocked: true` the slot is held without a customer or a price;
/// otherwise this behaves like a customer booking with an explicit payment
/// state, and past dates are allowed (back-filling).
#[derive(Debug, Deserialize)]
pub struct AdminBookingRequest {
    pub court_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub amount_paid: Option<Decimal>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Availability query parameters
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

/// Status update request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub amount_paid: Option<Decimal>,
}

/// Request to create a court
#[derive(Debug, Deserialize)]
pub struct CreateCourtRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
