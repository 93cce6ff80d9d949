//! Booking workflow services.
//!
//! These orchestrate the availability check, the pricing engine and the
//! reservation store. The in-memory availability check is advisory; the
//! reservations exclusion constraint has the final word, so a racing
//! request that slips past the check still fails with Conflict at insert.

use chrono::Local;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::AppError;
use crate::models::{BookingStatus, PaymentStatus, Reservation};
use crate::pricing;

use super::availability::{self, Availability, SlotRange};
use super::queries::{self, NewReservation};
use super::requests::{AdminBookingRequest, CreateBookingRequest};

/// Create a customer booking.
///
/// Order matters: validate, check availability, price, then persist. The
/// reservation is stored with status pending / payment pending; the
/// customer is resolved by phone and their booking count incremented.
pub async fn create_booking(
    pool: &PgPool,
    cache: &AppCache,
    req: CreateBookingRequest,
) -> Result<Reservation, AppError> {
    validate_phone(&req.customer_phone)?;
    if req.customer_name.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "Customer name is required".to_string(),
        ));
    }

    let start = pricing::requests::parse_time(&req.start_time)?;
    let end = pricing::requests::parse_time(&req.end_time)?;
    let slot = availability::resolve_slot(req.booking_date, start, end)?;
    availability::ensure_not_past(&slot, Local::now().naive_local())?;

    let court = queries::get_court(pool, req.court_id).await?;
    let customer = queries::find_or_create_customer(
        pool,
        req.customer_phone.trim(),
        req.customer_name.trim(),
        req.customer_email.as_deref(),
    )
    .await?;

    ensure_slot_free(pool, court.id, &slot).await?;

    let quote = pricing::services::quote_price(
        pool,
        cache,
        req.booking_date,
        start,
        end,
    )
    .await?;

    let reservation = queries::insert_reservation(
        pool,
        NewReservation {
            court_id: court.id,
            customer_id: Some(customer.id),
            booking_date: req.booking_date,
            starts_at: slot.starts_at,
            ends_at: slot.ends_at,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            amount_paid: Decimal::ZERO,
            discount: Decimal::ZERO,
            total_price: Some(quote.final_price),
            segments: serde_json::to_value(&quote.segments)
                .map_err(|e| AppError::Internal(e.to_string()))?,
            notes: req.notes,
        },
    )
    .await?;

    queries::increment_booking_count(pool, customer.id).await?;

    info!(
        reservation = %reservation.id,
        court = %court.id,
        "Booking created for {} - {}",
        slot.starts_at,
        slot.ends_at
    );
    Ok(reservation)
}

/// Create a reservation on behalf of an administrator.
///
/// Blocked slots hold the court with no customer and no price. Non-blocked
/// admin bookings are priced like customer bookings but accept an explicit
/// payment state and may sit in the past.
pub async fn create_admin_booking(
    pool: &PgPool,
    cache: &AppCache,
    req: AdminBookingRequest,
) -> Result<Reservation, AppError> {
    let start = pricing::requests::parse_time(&req.start_time)?;
    let end = pricing::requests::parse_time(&req.end_time)?;
    let slot = availability::resolve_slot(req.booking_date, start, end)?;

    let court = queries::get_court(pool, req.court_id).await?;
    ensure_slot_free(pool, court.id, &slot).await?;

    let new = if req.blocked {
        NewReservation {
            court_id: court.id,
            customer_id: None,
            booking_date: req.booking_date,
            starts_at: slot.starts_at,
            ends_at: slot.ends_at,
            status: BookingStatus::Blocked,
            payment_status: PaymentStatus::Pending,
            amount_paid: Decimal::ZERO,
            discount: Decimal::ZERO,
            total_price: None,
            segments: serde_json::json!([]),
            notes: req.notes,
        }
    } else {
        let phone = req.customer_phone.as_deref().ok_or_else(|| {
            AppError::InvalidRequest("customer_phone is required unless blocking".to_string())
        })?;
        validate_phone(phone)?;
        let name = req.customer_name.as_deref().unwrap_or("").trim().to_string();
        if name.is_empty() {
            return Err(AppError::InvalidRequest(
                "customer_name is required unless blocking".to_string(),
            ));
        }

        let customer = queries::find_or_create_customer(
            pool,
            phone.trim(),
            &name,
            req.customer_email.as_deref(),
        )
        .await?;
        let quote =
            pricing::services::quote_price(pool, cache, req.booking_date, start, end).await?;

        NewReservation {
            court_id: court.id,
            customer_id: Some(customer.id),
            booking_date: req.booking_date,
            starts_at: slot.starts_at,
            ends_at: slot.ends_at,
            status: BookingStatus::Pending,
            payment_status: req.payment_status.unwrap_or(PaymentStatus::Pending),
            amount_paid: req.amount_paid.unwrap_or(Decimal::ZERO),
            discount: Decimal::ZERO,
            total_price: Some(quote.final_price),
            segments: serde_json::to_value(&quote.segments)
                .map_err(|e| AppError::Internal(e.to_string()))?,
            notes: req.notes,
        }
    };

    let customer_id = new.customer_id;
    let reservation = queries::insert_reservation(pool, new).await?;
    if let Some(customer_id) = customer_id {
        queries::increment_booking_count(pool, customer_id).await?;
    }

    Ok(reservation)
}

/// Availability query for display; past slots are allowed
pub async fn query_availability(
    pool: &PgPool,
    court_id: Uuid,
    slot: &SlotRange,
) -> Result<Availability, AppError> {
    queries::get_court(pool, court_id).await?;
    let existing =
        queries::find_overlapping(pool, court_id, slot.starts_at, slot.ends_at).await?;
    Ok(availability::check_availability(slot, &existing))
}

/// Change a reservation's status.
///
/// Cancelled and completed reservations are terminal and reject any
/// further transition. Cancelling frees the slot for new bookings. The
/// terminal check lives in the UPDATE's WHERE clause, so two racing
/// status changes cannot both land: the loser's update matches no row
/// and surfaces as InvalidTransition here.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: BookingStatus,
    payment_status: Option<PaymentStatus>,
    amount_paid: Option<Decimal>,
) -> Result<Reservation, AppError> {
    match queries::update_status(pool, id, status, payment_status, amount_paid).await? {
        Some(reservation) => Ok(reservation),
        // No row matched: either the id is unknown (get_reservation
        // yields NotFound) or the reservation is already terminal.
        None => {
            let current = queries::get_reservation(pool, id).await?;
            Err(AppError::InvalidTransition {
                status: current.status.as_str().to_string(),
            })
        }
    }
}

async fn ensure_slot_free(
    pool: &PgPool,
    court_id: Uuid,
    slot: &SlotRange,
) -> Result<(), AppError> {
    let existing =
        queries::find_overlapping(pool, court_id, slot.starts_at, slot.ends_at).await?;
    let check = availability::check_availability(slot, &existing);
    if let Some(conflict) = check.conflict {
        return Err(AppError::Conflict(format!(
            "Court is already booked from {} to {}",
            conflict.starts_at, conflict.ends_at
        )));
    }
    Ok(())
}

/// Validate a customer phone number: optional leading +, 8 to 15 digits
pub fn validate_phone(phone: &str) -> Result<(), AppError> {
    let trimmed = phone.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.len() < 8 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidRequest(
            "Invalid phone number".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone_accepts_common_formats() {
        assert!(validate_phone("0501234567").is_ok());
        assert!(validate_phone("+966501234567").is_ok());
        assert!(validate_phone(" 0501234567 ").is_ok());
    }

    #[test]
    fn test_validate_phone_rejects_bad_input() {
        assert!(validate_phone("12345").is_err()); // too short
        assert!(validate_phone("1234567890123456").is_err()); // too long
        assert!(validate_phone("05012345ab").is_err());
        assert!(validate_phone("050-123-4567").is_err());
        assert!(validate_phone("").is_err());
    }
}
