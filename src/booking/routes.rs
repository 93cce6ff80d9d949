//! Booking and court route handlers

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::models::Court;
use crate::AppState;

use super::availability;
use super::queries;
use super::requests::{
    AdminBookingRequest, AvailabilityQuery, CreateBookingRequest, CreateCourtRequest,
    UpdateStatusRequest,
};
use super::responses::{AvailabilityResponse, ReservationResponse};
use super::services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings/:id", get(get_booking))
        .route("/bookings/:id/status", patch(update_status))
        .route("/admin/bookings", post(create_admin_booking))
        .route("/courts", get(list_courts).post(create_court))
        .route("/courts/:id", get(get_court))
        .route("/courts/:id/availability", get(check_availability))
}

/// Create a customer booking
async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<ReservationResponse>> {
    let reservation = services::create_booking(&state.db, &state.cache, req).await?;
    Ok(Json(reservation.into()))
}

/// Create an admin booking or block a slot
async fn create_admin_booking(
    State(state): State<AppState>,
    Json(req): Json<AdminBookingRequest>,
) -> Result<Json<ReservationResponse>> {
    let reservation = services::create_admin_booking(&state.db, &state.cache, req).await?;
    Ok(Json(reservation.into()))
}

/// Fetch a reservation with its price breakdown
async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationResponse>> {
    let reservation = queries::get_reservation(&state.db, id).await?;
    Ok(Json(reservation.into()))
}

/// Change a reservation's status (confirm, cancel, complete)
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<ReservationResponse>> {
    let reservation =
        services::update_status(&state.db, id, req.status, req.payment_status, req.amount_paid)
            .await?;
    Ok(Json(reservation.into()))
}

/// Availability check for display; no past-time restriction
async fn check_availability(
    State(state): State<AppState>,
    Path(court_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>> {
    let start = crate::pricing::requests::parse_time(&query.start_time)?;
    let end = crate::pricing::requests::parse_time(&query.end_time)?;
    let slot = availability::resolve_slot(query.date, start, end)?;

    let result = services::query_availability(&state.db, court_id, &slot).await?;
    Ok(Json(AvailabilityResponse {
        available: result.available,
        conflict: result.conflict.map(Into::into),
    }))
}

/// List active courts
async fn list_courts(State(state): State<AppState>) -> Result<Json<Vec<Court>>> {
    let courts = queries::list_courts(&state.db).await?;
    Ok(Json(courts))
}

/// Get a court by id
async fn get_court(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Court>> {
    let court = queries::get_court(&state.db, id).await?;
    Ok(Json(court))
}

/// Create a court
async fn create_court(
    State(state): State<AppState>,
    Json(req): Json<CreateCourtRequest>,
) -> Result<Json<Court>> {
    if req.name.trim().is_empty() {
        return Err(crate::error::AppError::InvalidRequest(
            "Court name is required".to_string(),
        ));
    }
    let court = queries::insert_court(&state.db, req.name.trim(), req.description.as_deref()).await?;
    Ok(Json(court))
}
