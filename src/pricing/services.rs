//! Pricing service functions with database access.
//!
//! These compose the pure calculators with the stored rate table. Rate
//! reads go through the cache; each computation works from one snapshot.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::AppError;

use super::calculators::{self, DayType, PriceQuote, PricingError, RateTable, TimeSlot};
use super::models::PricingRule;
use super::queries;

impl From<PricingError> for AppError {
    fn from(e: PricingError) -> Self {
        match e {
            PricingError::InvalidDuration { .. } => AppError::InvalidRequest(e.to_string()),
            PricingError::MissingRate { day_type, time_slot } => {
                AppError::MissingRate { day_type, time_slot }
            }
        }
    }
}

/// Load the active rate table, cache-first
pub async fn active_rate_table(pool: &PgPool, cache: &AppCache) -> Result<Arc<RateTable>, AppError> {
    if let Some(cached) = cache.get_rates().await {
        return Ok(cached);
    }

    let table = queries::load_rate_table(pool).await?;
    Ok(cache.set_rates(table).await)
}

/// Price a time range against the active rate table, with no side effects.
///
/// Used by the price-preview endpoint and by the booking workflow.
pub async fn quote_price(
    pool: &PgPool,
    cache: &AppCache,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> Result<PriceQuote, AppError> {
    let rates = active_rate_table(pool, cache).await?;
    Ok(calculators::compute_price(date, start, end, &rates)?)
}

/// Create a rate, enforcing positivity and (day_type, time_slot) uniqueness
pub async fn create_rate(
    pool: &PgPool,
    cache: &AppCache,
    day_type: DayType,
    time_slot: TimeSlot,
    hourly_rate: Decimal,
) -> Result<PricingRule, AppError> {
    ensure_positive(hourly_rate)?;
    let rule = queries::insert_rate(pool, day_type, time_slot, hourly_rate).await?;
    cache.invalidate_rates().await;
    Ok(rule)
}

/// Update a rate's hourly price
pub async fn update_rate(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
    hourly_rate: Decimal,
) -> Result<PricingRule, AppError> {
    ensure_positive(hourly_rate)?;
    let rule = queries::update_rate(pool, id, hourly_rate).await?;
    cache.invalidate_rates().await;
    Ok(rule)
}

/// Delete a rate
pub async fn delete_rate(pool: &PgPool, cache: &AppCache, id: Uuid) -> Result<(), AppError> {
    queries::delete_rate(pool, id).await?;
    cache.invalidate_rates().await;
    Ok(())
}

fn ensure_positive(rate: Decimal) -> Result<(), AppError> {
    if rate <= Decimal::ZERO {
        return Err(AppError::InvalidRequest(
            "Hourly rate must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive(dec!(90)).is_ok());
        assert!(ensure_positive(Decimal::ZERO).is_err());
        assert!(ensure_positive(dec!(-10)).is_err());
    }

    #[test]
    fn test_pricing_error_maps_to_app_error() {
        let err: AppError = PricingError::InvalidDuration { minutes: 30 }.into();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let err: AppError = PricingError::MissingRate {
            day_type: DayType::Weekend,
            time_slot: TimeSlot::Night,
        }
        .into();
        assert!(matches!(err, AppError::MissingRate { .. }));
    }
}
