//! Database queries for pricing rules.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::pricing::calculators::{DayType, RateTable, TimeSlot};

use super::models::PricingRule;

/// Load all active rates
pub async fn list_rates(pool: &PgPool) -> Result<Vec<PricingRule>, AppError> {
    let rates = sqlx::query_as::<_, PricingRule>(
        r#"
        SELECT id, day_type, time_slot, hourly_rate, created_at, updated_at
        FROM pricing_rules
        ORDER BY day_type, time_slot
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rates)
}

/// Build an in-memory rate table snapshot from the active rates
pub async fn load_rate_table(pool: &PgPool) -> Result<RateTable, AppError> {
    let mut table = RateTable::new();
    for rule in list_rates(pool).await? {
        table.set(rule.day_type, rule.time_slot, rule.hourly_rate);
    }
    Ok(table)
}

/// Find the active rate for one (day_type, time_slot) combination
pub async fn find_rate(
    pool: &PgPool,
    day_type: DayType,
    time_slot: TimeSlot,
) -> Result<PricingRule, AppError> {
    sqlx::query_as::<_, PricingRule>(
        r#"
        SELECT id, day_type, time_slot, hourly_rate, created_at, updated_at
        FROM pricing_rules
        WHERE day_type = $1 AND time_slot = $2
        "#,
    )
    .bind(day_type)
    .bind(time_slot)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Pricing rule"))
}

/// Insert a new rate.
///
/// The unique (day_type, time_slot) index is the invariant: a duplicate
/// pair surfaces as Conflict.
pub async fn insert_rate(
    pool: &PgPool,
    day_type: DayType,
    time_slot: TimeSlot,
    hourly_rate: Decimal,
) -> Result<PricingRule, AppError> {
    let result = sqlx::query_as::<_, PricingRule>(
        r#"
        INSERT INTO pricing_rules (day_type, time_slot, hourly_rate)
        VALUES ($1, $2, $3)
        RETURNING id, day_type, time_slot, hourly_rate, created_at, updated_at
        "#,
    )
    .bind(day_type)
    .bind(time_slot)
    .bind(hourly_rate)
    .fetch_one(pool)
    .await;

    match result {
        Ok(rule) => Ok(rule),
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
            "A rate for {}/{} already exists",
            day_type, time_slot
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Update an existing rate's hourly price
pub async fn update_rate(
    pool: &PgPool,
    id: Uuid,
    hourly_rate: Decimal,
) -> Result<PricingRule, AppError> {
    sqlx::query_as::<_, PricingRule>(
        r#"
        UPDATE pricing_rules
        SET hourly_rate = $2, updated_at = now()
        WHERE id = $1
        RETURNING id, day_type, time_slot, hourly_rate, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(hourly_rate)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Pricing rule"))
}

/// Delete a rate.
///
/// Future price calculations needing the deleted combination fail with
/// MissingRate until a replacement is created.
pub async fn delete_rate(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM pricing_rules WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Pricing rule"));
    }
    Ok(())
}

/// Seed the canonical default rates, skipping combinations that already
/// have one. Safe to run on every startup.
pub async fn seed_default_rates(pool: &PgPool) -> Result<(), AppError> {
    let defaults = RateTable::defaults();
    for day_type in [DayType::Weekday, DayType::Weekend] {
        for time_slot in [TimeSlot::Day, TimeSlot::Night] {
            let Some(rate) = defaults.rate(day_type, time_slot) else {
                continue;
            };
            sqlx::query(
                r#"
                INSERT INTO pricing_rules (day_type, time_slot, hourly_rate)
                VALUES ($1, $2, $3)
                ON CONFLICT (day_type, time_slot) DO NOTHING
                "#,
            )
            .bind(day_type)
            .bind(time_slot)
            .bind(rate)
            .execute(pool)
            .await?;
        }
    }
    Ok(())
}

/// Postgres unique_violation (23505)
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
