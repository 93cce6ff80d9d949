//! Pricing and rate administration route handlers

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::AppState;

use super::models::PricingRule;
use super::requests::{parse_time, CreateRateRequest, PricePreviewRequest, UpdateRateRequest};
use super::responses::PriceQuoteResponse;
use super::services;

/// Query parameters for a rate lookup
#[derive(Debug, Deserialize)]
struct RateLookupQuery {
    day_type: super::calculators::DayType,
    time_slot: super::calculators::TimeSlot,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pricing/preview", post(preview))
        .route("/rates", get(list_rates).post(create_rate))
        .route("/rates/lookup", get(lookup_rate))
        .route("/rates/:id", put(update_rate).delete(delete_rate))
}

/// Price estimate for a prospective booking; nothing is persisted
async fn preview(
    State(state): State<AppState>,
    Json(req): Json<PricePreviewRequest>,
) -> Result<Json<PriceQuoteResponse>> {
    let start = parse_time(&req.start_time)?;
    let end = parse_time(&req.end_time)?;

    let quote =
        services::quote_price(&state.db, &state.cache, req.booking_date, start, end).await?;
    Ok(Json(quote.into()))
}

/// List all active rates
async fn list_rates(State(state): State<AppState>) -> Result<Json<Vec<PricingRule>>> {
    let rates = super::queries::list_rates(&state.db).await?;
    Ok(Json(rates))
}

/// Find the active rate for one (day_type, time_slot) combination
async fn lookup_rate(
    State(state): State<AppState>,
    Query(query): Query<RateLookupQuery>,
) -> Result<Json<PricingRule>> {
    let rule = super::queries::find_rate(&state.db, query.day_type, query.time_slot).await?;
    Ok(Json(rule))
}

/// Create a rate for a (day_type, time_slot) combination
async fn create_rate(
    State(state): State<AppState>,
    Json(req): Json<CreateRateRequest>,
) -> Result<Json<PricingRule>> {
    let rule = services::create_rate(
        &state.db,
        &state.cache,
        req.day_type,
        req.time_slot,
        req.hourly_rate,
    )
    .await?;
    Ok(Json(rule))
}

/// Update a rate's hourly price
async fn update_rate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRateRequest>,
) -> Result<Json<PricingRule>> {
    let rule = services::update_rate(&state.db, &state.cache, id, req.hourly_rate).await?;
    Ok(Json(rule))
}

/// Delete a rate; pricing for that combination fails until replaced
async fn delete_rate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    services::delete_rate(&state.db, &state.cache, id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
