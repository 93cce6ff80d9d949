//! Database models for pricing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::calculators::{DayType, TimeSlot};

/// One administered rate from pricing_rules.
///
/// The (day_type, time_slot) pair is unique: at most one active rate per
/// combination.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PricingRule {
    pub id: Uuid,
    pub day_type: DayType,
    pub time_slot: TimeSlot,
    #[serde(with = "rust_decimal::serde::str")]
    pub hourly_rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
