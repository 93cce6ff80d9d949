//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{PriceQuote, PricedSegment};

/// Price estimate for a requested time range
#[derive(Debug, Serialize)]
pub struct PriceQuoteResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_hours: Decimal,
    pub breakdown: Vec<PricedSegment>,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_price: Decimal,
}

impl From<PriceQuote> for PriceQuoteResponse {
    fn from(quote: PriceQuote) -> Self {
        Self {
            total_hours: quote.total_hours,
            breakdown: quote.segments,
            final_price: quote.final_price,
        }
    }
}
