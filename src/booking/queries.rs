//! Database queries for courts, customers and reservations.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{BookingStatus, Court, Customer, PaymentStatus, Reservation};

const RESERVATION_COLUMNS: &str = r#"
    id, court_id, customer_id, booking_date, starts_at, ends_at,
    status, payment_status, amount_paid, discount, total_price,
    segments, notes, created_at, updated_at
"#;

/// New reservation row, already resolved and priced
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub court_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub booking_date: NaiveDate,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub amount_paid: Decimal,
    pub discount: Decimal,
    pub total_price: Option<Decimal>,
    pub segments: serde_json::Value,
    pub notes: Option<String>,
}

// ==================== courts ====================

/// Get an active court by id
pub async fn get_court(pool: &PgPool, id: Uuid) -> Result<Court, AppError> {
    sqlx::query_as::<_, Court>(
        r#"
        SELECT id, name, description, active, created_at
        FROM courts
        WHERE id = $1 AND active = true
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Court"))
}

/// List active courts
pub async fn list_courts(pool: &PgPool) -> Result<Vec<Court>, AppError> {
    let courts = sqlx::query_as::<_, Court>(
        r#"
        SELECT id, name, description, active, created_at
        FROM courts
        WHERE active = true
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(courts)
}

/// Create a court
pub async fn insert_court(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
) -> Result<Court, AppError> {
    let court = sqlx::query_as::<_, Court>(
        r#"
        INSERT INTO courts (name, description)
        VALUES ($1, $2)
        RETURNING id, name, description, active, created_at
        "#,
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(court)
}

// ==================== customers ====================

/// Resolve a customer by phone, creating one if absent.
///
/// Phone is the unique customer key; a concurrent insert of the same phone
/// falls back to the existing row.
pub async fn find_or_create_customer(
    pool: &PgPool,
    phone: &str,
    name: &str,
    email: Option<&str>,
) -> Result<Customer, AppError> {
    let customer = sqlx::query_as::<_, Customer>(
        r#"
        INSERT INTO customers (phone, name, email)
        VALUES ($1, $2, $3)
        ON CONFLICT (phone) DO UPDATE
        SET name = EXCLUDED.name,
            email = COALESCE(EXCLUDED.email, customers.email)
        RETURNING id, name, phone, email, total_bookings, created_at
        "#,
    )
    .bind(phone)
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await?;

    Ok(customer)
}

/// Bump the customer's running booking count
pub async fn increment_booking_count(pool: &PgPool, customer_id: Uuid) -> Result<(), AppError> {
    sqlx::query("UPDATE customers SET total_bookings = total_bookings + 1 WHERE id = $1")
        .bind(customer_id)
        .execute(pool)
        .await?;

    Ok(())
}

// ==================== reservations ====================

/// Get a reservation by id
pub async fn get_reservation(pool: &PgPool, id: Uuid) -> Result<Reservation, AppError> {
    sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {} FROM reservations WHERE id = $1",
        RESERVATION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Reservation"))
}

/// Fetch non-cancelled reservations for a court overlapping a timestamp
/// window.
///
/// The window is the resolved [starts_at, ends_at) of the request, so a
/// midnight-crossing slot naturally covers both calendar days.
pub async fn find_overlapping(
    pool: &PgPool,
    court_id: Uuid,
    starts_at: NaiveDateTime,
    ends_at: NaiveDateTime,
) -> Result<Vec<Reservation>, AppError> {
    let reservations = sqlx::query_as::<_, Reservation>(&format!(
        r#"
        SELECT {}
        FROM reservations
        WHERE court_id = $1
          AND status <> 'cancelled'
          AND starts_at < $3
          AND ends_at > $2
        ORDER BY starts_at
        "#,
        RESERVATION_COLUMNS
    ))
    .bind(court_id)
    .bind(starts_at)
    .bind(ends_at)
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

/// Insert a reservation.
///
/// The no_double_booking exclusion constraint is the final word on
/// availability: if a concurrent request won the slot between our check
/// and this insert, the database rejects the row and we surface Conflict.
pub async fn insert_reservation(
    pool: &PgPool,
    new: NewReservation,
) -> Result<Reservation, AppError> {
    let result = sqlx::query_as::<_, Reservation>(&format!(
        r#"
        INSERT INTO reservations (
            court_id, customer_id, booking_date, starts_at, ends_at,
            status, payment_status, amount_paid, discount, total_price,
            segments, notes
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {}
        "#,
        RESERVATION_COLUMNS
    ))
    .bind(new.court_id)
    .bind(new.customer_id)
    .bind(new.booking_date)
    .bind(new.starts_at)
    .bind(new.ends_at)
    .bind(new.status)
    .bind(new.payment_status)
    .bind(new.amount_paid)
    .bind(new.discount)
    .bind(new.total_price)
    .bind(new.segments)
    .bind(new.notes)
    .fetch_one(pool)
    .await;

    match result {
        Ok(reservation) => Ok(reservation),
        Err(e) if is_slot_conflict(&e) => Err(AppError::Conflict(
            "Court is already booked for the requested time".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Update a reservation's status and optionally its payment fields.
///
/// The WHERE clause filters out terminal rows, so the database enforces
/// the invariant even when two status changes race: a just-cancelled
/// reservation can never be flipped to another status. Returns `None`
/// when the id is unknown or the row is already terminal; the caller
/// re-reads to tell the two apart.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: BookingStatus,
    payment_status: Option<PaymentStatus>,
    amount_paid: Option<Decimal>,
) -> Result<Option<Reservation>, AppError> {
    let updated = sqlx::query_as::<_, Reservation>(&update_status_sql())
        .bind(id)
        .bind(status)
        .bind(payment_status)
        .bind(amount_paid)
        .fetch_optional(pool)
        .await?;

    Ok(updated)
}

fn update_status_sql() -> String {
    format!(
        r#"
        UPDATE reservations
        SET status = $2,
            payment_status = COALESCE($3, payment_status),
            amount_paid = COALESCE($4, amount_paid),
            updated_at = now()
        WHERE id = $1
          AND status NOT IN ('cancelled', 'completed')
        RETURNING {}
        "#,
        RESERVATION_COLUMNS
    )
}

/// Postgres exclusion_violation (23P01) from no_double_booking, or a
/// unique_violation on the same slot key
fn is_slot_conflict(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db)
            if matches!(db.code().as_deref(), Some("23P01") | Some("23505"))
    )
}
