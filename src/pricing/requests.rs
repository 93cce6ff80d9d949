//! Request DTOs for pricing API endpoints.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::AppError;

use super::calculators::{DayType, TimeSlot};

/// Request for a price estimate; no persistence side effect
#[derive(Debug, Deserialize)]
pub struct PricePreviewRequest {
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

/// Request to create a pricing rule
#[derive(Debug, Deserialize)]
pub struct CreateRateRequest {
    pub day_type: DayType,
    pub time_slot: TimeSlot,
    #[serde(with = "rust_decimal::serde::str")]
    pub hourly_rate: Decimal,
}

/// Request to update a pricing rule
#[derive(Debug, Deserialize)]
pub struct UpdateRateRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub hourly_rate: Decimal,
}

/// Parse a wall-clock "HH:MM" time string
pub fn parse_time(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::InvalidRequest(format!("Invalid time \"{}\", expected HH:MM", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time() {
        assert_eq!(
            parse_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time("23:00").unwrap(),
            NaiveTime::from_hms_opt(23, 0, 0).unwrap()
        );
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("noon").is_err());
    }
}
