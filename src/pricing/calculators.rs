//! Core pricing calculation functions.
//!
//! Pure functions for slot classification and price segmentation - no
//! database access. The rate table is passed in as an in-memory snapshot.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fixed hourly rate for nights whose effective date is a Saturday.
///
/// This is a deliberate carve-out from the rate table: the weekend/night
/// table entry covers Thursday/Friday-derived nights, while Saturday nights
/// are always charged this literal rate, even if the table entry changes.
pub const SATURDAY_NIGHT_RATE: Decimal = dec!(110);

/// Minutes per hour, as Decimal divisor for fractional-hour math.
const MINUTES_PER_HOUR: Decimal = dec!(60);

/// Weekday/weekend classification of a calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "day_type", rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Weekend,
}

/// Day/night classification of an hour of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "time_slot", rename_all = "lowercase")]
pub enum TimeSlot {
    Day,
    Night,
}

impl DayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Weekday => "weekday",
            DayType::Weekend => "weekend",
        }
    }
}

impl TimeSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Day => "day",
            TimeSlot::Night => "night",
        }
    }
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-memory snapshot of the active hourly rates.
///
/// Exactly one rate per (DayType, TimeSlot) pair; a missing entry makes
/// pricing for that combination fail with [`PricingError::MissingRate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    weekday_day: Option<Decimal>,
    weekday_night: Option<Decimal>,
    weekend_day: Option<Decimal>,
    weekend_night: Option<Decimal>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical default rates seeded on first startup.
    pub fn defaults() -> Self {
        let mut table = Self::new();
        table.set(DayType::Weekday, TimeSlot::Day, dec!(90));
        table.set(DayType::Weekday, TimeSlot::Night, dec!(110));
        table.set(DayType::Weekend, TimeSlot::Day, dec!(110));
        table.set(DayType::Weekend, TimeSlot::Night, dec!(135));
        table
    }

    pub fn set(&mut self, day_type: DayType, time_slot: TimeSlot, rate: Decimal) {
        *self.slot_mut(day_type, time_slot) = Some(rate);
    }

    pub fn rate(&self, day_type: DayType, time_slot: TimeSlot) -> Option<Decimal> {
        match (day_type, time_slot) {
            (DayType::Weekday, TimeSlot::Day) => self.weekday_day,
            (DayType::Weekday, TimeSlot::Night) => self.weekday_night,
            (DayType::Weekend, TimeSlot::Day) => self.weekend_day,
            (DayType::Weekend, TimeSlot::Night) => self.weekend_night,
        }
    }

    fn slot_mut(&mut self, day_type: DayType, time_slot: TimeSlot) -> &mut Option<Decimal> {
        match (day_type, time_slot) {
            (DayType::Weekday, TimeSlot::Day) => &mut self.weekday_day,
            (DayType::Weekday, TimeSlot::Night) => &mut self.weekday_night,
            (DayType::Weekend, TimeSlot::Day) => &mut self.weekend_day,
            (DayType::Weekend, TimeSlot::Night) => &mut self.weekend_night,
        }
    }
}

/// One hour-bounded slice of a booking's duration with its own rate.
///
/// Segments never span a clock-hour boundary, so `hours` is at most 1 and
/// always an exact fraction (no rounding).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedSegment {
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub day_type: DayType,
    pub time_slot: TimeSlot,
    #[serde(with = "rust_decimal::serde::str")]
    pub hours: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// Full price breakdown for a requested time range
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub total_hours: Decimal,
    pub segments: Vec<PricedSegment>,
    pub final_price: Decimal,
}

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    InvalidDuration { minutes: i64 },
    MissingRate { day_type: DayType, time_slot: TimeSlot },
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::InvalidDuration { minutes } => {
                write!(
                    f,
                    "Duration of {} minutes is invalid: bookings must be at least 1 hour in 30-minute steps",
                    minutes
                )
            }
            PricingError::MissingRate { day_type, time_slot } => {
                write!(f, "No active rate for {}/{}", day_type, time_slot)
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// Classify an hour of day as day or night.
///
/// Night runs 18:00-08:59 and therefore crosses midnight.
pub fn slot_for_hour(hour: u32) -> TimeSlot {
    if hour >= 18 || hour < 9 {
        TimeSlot::Night
    } else {
        TimeSlot::Day
    }
}

/// Resolve the calendar date an hour classifies against.
///
/// Hours in [00:00, 04:00) belong to the previous day's evening, so the
/// late tail of a Friday-night booking stays priced as Friday night.
pub fn effective_date(date: NaiveDate, hour: u32) -> NaiveDate {
    if hour < 4 {
        date - Days::new(1)
    } else {
        date
    }
}

/// Classify the effective date as weekday or weekend for a given slot.
///
/// Day hours follow the Friday/Saturday weekend convention. Night hours
/// start the weekend one evening earlier: Thursday and Friday nights carry
/// the weekend/night table rate, and Saturday nights fall to the fixed
/// override (see [`SATURDAY_NIGHT_RATE`]).
pub fn day_type_for(effective: NaiveDate, time_slot: TimeSlot) -> DayType {
    let weekend = match time_slot {
        TimeSlot::Day => matches!(effective.weekday(), Weekday::Fri | Weekday::Sat),
        TimeSlot::Night => matches!(
            effective.weekday(),
            Weekday::Thu | Weekday::Fri | Weekday::Sat
        ),
    };
    if weekend {
        DayType::Weekend
    } else {
        DayType::Weekday
    }
}

/// Compute the price breakdown for a time range on a given date.
///
/// `end <= start` is interpreted as ending on the following calendar day.
/// The range is walked in steps bounded by the next clock-hour boundary and
/// the requested end; each step becomes one [`PricedSegment`] classified by
/// the hour at its start instant. Adjacent segments are never merged, so
/// segment boundaries always align with hour boundaries.
pub fn compute_price(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    rates: &RateTable,
) -> Result<PriceQuote, PricingError> {
    let start_min = (start.hour() * 60 + start.minute()) as i64;
    let mut end_min = (end.hour() * 60 + end.minute()) as i64;
    if end_min <= start_min {
        // Midnight rollover: the range ends on the next calendar day
        end_min += 24 * 60;
    }

    let duration = end_min - start_min;
    if duration < 60 || duration % 30 != 0 {
        return Err(PricingError::InvalidDuration { minutes: duration });
    }

    let midnight = date.and_time(NaiveTime::MIN);
    let mut segments = Vec::new();
    let mut final_price = Decimal::ZERO;

    let mut cursor = start_min;
    while cursor < end_min {
        let step_end = ((cursor / 60 + 1) * 60).min(end_min);

        let hour_of_day = (cursor / 60 % 24) as u32;
        let nominal = date + Days::new((cursor / 60 / 24) as u64);
        let effective = effective_date(nominal, hour_of_day);

        let time_slot = slot_for_hour(hour_of_day);
        let day_type = day_type_for(effective, time_slot);

        let rate = if time_slot == TimeSlot::Night && effective.weekday() == Weekday::Sat {
            SATURDAY_NIGHT_RATE
        } else {
            rates
                .rate(day_type, time_slot)
                .ok_or(PricingError::MissingRate { day_type, time_slot })?
        };

        let hours = Decimal::from(step_end - cursor) / MINUTES_PER_HOUR;
        let price = rate * hours;
        final_price += price;

        segments.push(PricedSegment {
            starts_at: midnight + Duration::minutes(cursor),
            ends_at: midnight + Duration::minutes(step_end),
            day_type,
            time_slot,
            hours,
            rate,
            price,
        });

        cursor = step_end;
    }

    Ok(PriceQuote {
        total_hours: Decimal::from(duration) / MINUTES_PER_HOUR,
        segments,
        final_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // 2025-06-02 is a Monday; the week runs Mon 2nd .. Sun 8th.
    const MONDAY: (i32, u32, u32) = (2025, 6, 2);
    const THURSDAY: (i32, u32, u32) = (2025, 6, 5);
    const FRIDAY: (i32, u32, u32) = (2025, 6, 6);
    const SATURDAY: (i32, u32, u32) = (2025, 6, 7);
    const SUNDAY: (i32, u32, u32) = (2025, 6, 8);

    fn day(ymd: (i32, u32, u32)) -> NaiveDate {
        d(ymd.0, ymd.1, ymd.2)
    }

    // ==================== classification tests ====================

    #[test]
    fn test_slot_for_hour_boundaries() {
        assert_eq!(slot_for_hour(8), TimeSlot::Night);
        assert_eq!(slot_for_hour(9), TimeSlot::Day);
        assert_eq!(slot_for_hour(17), TimeSlot::Day);
        assert_eq!(slot_for_hour(18), TimeSlot::Night);
        assert_eq!(slot_for_hour(0), TimeSlot::Night);
        assert_eq!(slot_for_hour(23), TimeSlot::Night);
    }

    #[test]
    fn test_effective_date_shifts_late_night_back() {
        assert_eq!(effective_date(day(SATURDAY), 0), day(FRIDAY));
        assert_eq!(effective_date(day(SATURDAY), 3), day(FRIDAY));
        assert_eq!(effective_date(day(SATURDAY), 4), day(SATURDAY));
        assert_eq!(effective_date(day(SATURDAY), 23), day(SATURDAY));
    }

    #[test]
    fn test_day_type_day_hours_friday_saturday_weekend() {
        assert_eq!(day_type_for(day(THURSDAY), TimeSlot::Day), DayType::Weekday);
        assert_eq!(day_type_for(day(FRIDAY), TimeSlot::Day), DayType::Weekend);
        assert_eq!(day_type_for(day(SATURDAY), TimeSlot::Day), DayType::Weekend);
        assert_eq!(day_type_for(day(SUNDAY), TimeSlot::Day), DayType::Weekday);
    }

    #[test]
    fn test_day_type_night_hours_weekend_starts_thursday() {
        assert_eq!(day_type_for(day(MONDAY), TimeSlot::Night), DayType::Weekday);
        assert_eq!(day_type_for(day(THURSDAY), TimeSlot::Night), DayType::Weekend);
        assert_eq!(day_type_for(day(FRIDAY), TimeSlot::Night), DayType::Weekend);
        assert_eq!(day_type_for(day(SATURDAY), TimeSlot::Night), DayType::Weekend);
        assert_eq!(day_type_for(day(SUNDAY), TimeSlot::Night), DayType::Weekday);
    }

    // ==================== duration validation tests ====================

    #[test]
    fn test_compute_price_rejects_under_one_hour() {
        let err = compute_price(day(MONDAY), t(14, 0), t(14, 30), &RateTable::defaults());
        assert_eq!(err, Err(PricingError::InvalidDuration { minutes: 30 }));
    }

    #[test]
    fn test_compute_price_rejects_non_half_hour_granularity() {
        let err = compute_price(day(MONDAY), t(14, 0), t(15, 15), &RateTable::defaults());
        assert_eq!(err, Err(PricingError::InvalidDuration { minutes: 75 }));
    }

    #[test]
    fn test_compute_price_missing_rate() {
        let mut table = RateTable::new();
        table.set(DayType::Weekday, TimeSlot::Night, dec!(110));
        let err = compute_price(day(MONDAY), t(14, 0), t(16, 0), &table);
        assert_eq!(
            err,
            Err(PricingError::MissingRate {
                day_type: DayType::Weekday,
                time_slot: TimeSlot::Day,
            })
        );
    }

    // ==================== pricing scenario tests ====================

    #[test]
    fn test_weekday_afternoon_two_hours() {
        // Monday 14:00-16:00: two 1h day segments at the weekday/day rate
        let quote =
            compute_price(day(MONDAY), t(14, 0), t(16, 0), &RateTable::defaults()).unwrap();

        assert_eq!(quote.total_hours, dec!(2));
        assert_eq!(quote.final_price, dec!(180));
        assert_eq!(quote.segments.len(), 2);
        for seg in &quote.segments {
            assert_eq!(seg.day_type, DayType::Weekday);
            assert_eq!(seg.time_slot, TimeSlot::Day);
            assert_eq!(seg.rate, dec!(90));
            assert_eq!(seg.hours, dec!(1));
            assert_eq!(seg.price, dec!(90));
        }
    }

    #[test]
    fn test_thursday_night_across_midnight_is_weekend() {
        // Thursday 22:00 - Friday 01:00: three segments, all weekend/night.
        // The 00:00-01:00 segment shifts back to Thursday before classifying.
        let quote =
            compute_price(day(THURSDAY), t(22, 0), t(1, 0), &RateTable::defaults()).unwrap();

        assert_eq!(quote.total_hours, dec!(3));
        assert_eq!(quote.segments.len(), 3);
        for seg in &quote.segments {
            assert_eq!(seg.day_type, DayType::Weekend);
            assert_eq!(seg.time_slot, TimeSlot::Night);
            assert_eq!(seg.rate, dec!(135));
        }
        assert_eq!(quote.final_price, dec!(405));

        // Segment boundaries land exactly on the clock hours
        let starts: Vec<_> = quote.segments.iter().map(|s| s.starts_at).collect();
        assert_eq!(starts[0], day(THURSDAY).and_time(t(22, 0)));
        assert_eq!(starts[1], day(THURSDAY).and_time(t(23, 0)));
        assert_eq!(starts[2], day(FRIDAY).and_time(t(0, 0)));
        assert_eq!(
            quote.segments[2].ends_at,
            day(FRIDAY).and_time(t(1, 0))
        );
    }

    #[test]
    fn test_saturday_night_override_beats_the_table() {
        // Saturday 19:00-21:00 is charged the fixed override, not the
        // weekend/night entry, even with an inflated table.
        let mut table = RateTable::defaults();
        table.set(DayType::Weekend, TimeSlot::Night, dec!(500));

        let quote = compute_price(day(SATURDAY), t(19, 0), t(21, 0), &table).unwrap();

        assert_eq!(quote.segments.len(), 2);
        for seg in &quote.segments {
            assert_eq!(seg.rate, SATURDAY_NIGHT_RATE);
            assert_eq!(seg.day_type, DayType::Weekend);
            assert_eq!(seg.time_slot, TimeSlot::Night);
        }
        assert_eq!(quote.final_price, dec!(220));
    }

    #[test]
    fn test_sunday_early_hours_shift_to_saturday_override() {
        // Sunday 02:00-04:00 classifies against Saturday, so the override
        // applies to the whole range.
        let quote =
            compute_price(day(SUNDAY), t(2, 0), t(4, 0), &RateTable::defaults()).unwrap();

        for seg in &quote.segments {
            assert_eq!(seg.rate, SATURDAY_NIGHT_RATE);
        }
        assert_eq!(quote.final_price, dec!(220));
    }

    #[test]
    fn test_half_hour_segment_across_day_night_boundary() {
        // Monday 17:00-18:30: 1h of day, then a 0.5h night segment priced
        // independently with exact fractional hours.
        let quote =
            compute_price(day(MONDAY), t(17, 0), t(18, 30), &RateTable::defaults()).unwrap();

        assert_eq!(quote.segments.len(), 2);
        assert_eq!(quote.segments[0].time_slot, TimeSlot::Day);
        assert_eq!(quote.segments[0].hours, dec!(1));
        assert_eq!(quote.segments[0].price, dec!(90));
        assert_eq!(quote.segments[1].time_slot, TimeSlot::Night);
        assert_eq!(quote.segments[1].hours, dec!(0.5));
        assert_eq!(quote.segments[1].price, dec!(55));
        assert_eq!(quote.final_price, dec!(145));
        assert_eq!(quote.total_hours, dec!(1.5));
    }

    #[test]
    fn test_half_hour_start_splits_at_hour_boundary() {
        // Monday 14:30-16:00: first segment is only 30 minutes so the next
        // one starts on the clock hour.
        let quote =
            compute_price(day(MONDAY), t(14, 30), t(16, 0), &RateTable::defaults()).unwrap();

        assert_eq!(quote.segments.len(), 2);
        assert_eq!(quote.segments[0].hours, dec!(0.5));
        assert_eq!(quote.segments[0].ends_at, day(MONDAY).and_time(t(15, 0)));
        assert_eq!(quote.segments[1].hours, dec!(1));
        assert_eq!(quote.final_price, dec!(135));
    }

    #[test]
    fn test_segments_cover_duration_exactly() {
        // Durations sum to the requested range with no gaps or overlap,
        // and segment prices sum to the final price.
        let cases = [
            (day(MONDAY), t(9, 0), t(12, 30)),
            (day(THURSDAY), t(22, 0), t(1, 0)),
            (day(FRIDAY), t(8, 30), t(10, 0)),
            (day(SATURDAY), t(23, 0), t(5, 0)),
        ];

        for (date, start, end) in cases {
            let quote = compute_price(date, start, end, &RateTable::defaults()).unwrap();

            let hours: Decimal = quote.segments.iter().map(|s| s.hours).sum();
            assert_eq!(hours, quote.total_hours);

            let price: Decimal = quote.segments.iter().map(|s| s.price).sum();
            assert_eq!(price, quote.final_price);

            for pair in quote.segments.windows(2) {
                assert_eq!(pair[0].ends_at, pair[1].starts_at);
            }
        }
    }

    #[test]
    fn test_compute_price_is_pure() {
        let table = RateTable::defaults();
        let a = compute_price(day(FRIDAY), t(20, 0), t(23, 30), &table).unwrap();
        let b = compute_price(day(FRIDAY), t(20, 0), t(23, 30), &table).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rate_table_defaults() {
        let table = RateTable::defaults();
        assert_eq!(table.rate(DayType::Weekday, TimeSlot::Day), Some(dec!(90)));
        assert_eq!(table.rate(DayType::Weekday, TimeSlot::Night), Some(dec!(110)));
        assert_eq!(table.rate(DayType::Weekend, TimeSlot::Day), Some(dec!(110)));
        assert_eq!(table.rate(DayType::Weekend, TimeSlot::Night), Some(dec!(135)));
    }
}
