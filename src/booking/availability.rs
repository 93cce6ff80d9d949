//! Availability checking for court time slots.
//!
//! Pure functions - no database access. The caller fetches the candidate
//! reservations and passes them in.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::AppError;
use crate::models::Reservation;

/// A resolved half-open booking interval `[starts_at, ends_at)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
}

/// Outcome of an availability check
#[derive(Debug, Clone)]
pub struct Availability {
    pub available: bool,
    pub conflict: Option<Reservation>,
}

/// Resolve a requested time range into concrete instants.
///
/// `end <= start` means the range crosses midnight and ends on the next
/// calendar day. The resolved range must be at least 1 hour long and an
/// exact multiple of 30 minutes.
pub fn resolve_slot(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> Result<SlotRange, AppError> {
    let starts_at = date.and_time(start);
    let ends_at = if end <= start {
        (date + Days::new(1)).and_time(end)
    } else {
        date.and_time(end)
    };

    let minutes = (ends_at - starts_at).num_minutes();
    if minutes < 60 {
        return Err(AppError::InvalidRequest(
            "Booking must be at least 1 hour long".to_string(),
        ));
    }
    if minutes % 30 != 0 {
        return Err(AppError::InvalidRequest(
            "Booking length must be a multiple of 30 minutes".to_string(),
        ));
    }

    Ok(SlotRange { starts_at, ends_at })
}

/// Reject slots whose start is strictly in the past.
///
/// Applied when creating a customer booking; availability queries for
/// display skip it.
pub fn ensure_not_past(slot: &SlotRange, now: NaiveDateTime) -> Result<(), AppError> {
    if slot.starts_at < now {
        return Err(AppError::InvalidRequest(
            "Booking start time is in the past".to_string(),
        ));
    }
    Ok(())
}

/// Half-open interval overlap: adjacent ranges never overlap
pub fn overlaps(s1: NaiveDateTime, e1: NaiveDateTime, s2: NaiveDateTime, e2: NaiveDateTime) -> bool {
    s1 < e2 && s2 < e1
}

/// Check a requested slot against existing reservations for the court.
///
/// Cancelled reservations are ignored; everything else (including blocked
/// slots) occupies the court. Returns the first conflicting reservation.
pub fn check_availability(slot: &SlotRange, existing: &[Reservation]) -> Availability {
    for reservation in existing {
        if !reservation.status.occupies_slot() {
            continue;
        }
        if overlaps(
            slot.starts_at,
            slot.ends_at,
            reservation.starts_at,
            reservation.ends_at,
        ) {
            return Availability {
                available: false,
                conflict: Some(reservation.clone()),
            };
        }
    }
    Availability {
        available: true,
        conflict: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::models::{BookingStatus, PaymentStatus};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn reservation(status: BookingStatus, start: NaiveDateTime, end: NaiveDateTime) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            court_id: Uuid::new_v4(),
            customer_id: None,
            booking_date: start.date(),
            starts_at: start,
            ends_at: end,
            status,
            payment_status: PaymentStatus::Pending,
            amount_paid: Decimal::ZERO,
            discount: Decimal::ZERO,
            total_price: None,
            segments: serde_json::json!([]),
            notes: None,
            created_at: DateTime::<Utc>::MIN_UTC,
            updated_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    // ==================== resolve_slot tests ====================

    #[test]
    fn test_resolve_slot_same_day() {
        let slot = resolve_slot(date(), t(10, 0), t(12, 0)).unwrap();
        assert_eq!(slot.starts_at, date().and_time(t(10, 0)));
        assert_eq!(slot.ends_at, date().and_time(t(12, 0)));
    }

    #[test]
    fn test_resolve_slot_midnight_rollover() {
        let slot = resolve_slot(date(), t(23, 0), t(1, 0)).unwrap();
        assert_eq!(slot.starts_at, date().and_time(t(23, 0)));
        assert_eq!(slot.ends_at, (date() + Days::new(1)).and_time(t(1, 0)));
    }

    #[test]
    fn test_resolve_slot_equal_times_roll_to_full_day() {
        // end == start resolves to a 24 hour range on the next day
        let slot = resolve_slot(date(), t(10, 0), t(10, 0)).unwrap();
        assert_eq!(slot.ends_at - slot.starts_at, chrono::Duration::hours(24));
    }

    #[test]
    fn test_resolve_slot_rejects_short_range() {
        assert!(resolve_slot(date(), t(10, 0), t(10, 30)).is_err());
    }

    #[test]
    fn test_resolve_slot_rejects_off_grid_duration() {
        assert!(resolve_slot(date(), t(10, 0), t(11, 15)).is_err());
        assert!(resolve_slot(date(), t(10, 0), t(11, 30)).is_ok());
    }

    #[test]
    fn test_ensure_not_past() {
        let slot = resolve_slot(date(), t(10, 0), t(12, 0)).unwrap();
        assert!(ensure_not_past(&slot, date().and_time(t(9, 0))).is_ok());
        assert!(ensure_not_past(&slot, date().and_time(t(10, 0))).is_ok());
        assert!(ensure_not_past(&slot, date().and_time(t(10, 1))).is_err());
    }

    // ==================== overlap tests ====================

    #[test]
    fn test_overlap_is_symmetric() {
        let a = (date().and_time(t(10, 0)), date().and_time(t(12, 0)));
        let b = (date().and_time(t(11, 0)), date().and_time(t(13, 0)));
        assert!(overlaps(a.0, a.1, b.0, b.1));
        assert!(overlaps(b.0, b.1, a.0, a.1));
    }

    #[test]
    fn test_adjacent_slots_do_not_overlap() {
        let a = (date().and_time(t(10, 0)), date().and_time(t(12, 0)));
        let b = (date().and_time(t(12, 0)), date().and_time(t(14, 0)));
        assert!(!overlaps(a.0, a.1, b.0, b.1));
        assert!(!overlaps(b.0, b.1, a.0, a.1));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = (date().and_time(t(10, 0)), date().and_time(t(14, 0)));
        let inner = (date().and_time(t(11, 0)), date().and_time(t(12, 0)));
        assert!(overlaps(outer.0, outer.1, inner.0, inner.1));
    }

    // ==================== check_availability tests ====================

    #[test]
    fn test_conflict_returns_the_existing_reservation() {
        let existing = reservation(
            BookingStatus::Pending,
            date().and_time(t(10, 0)),
            date().and_time(t(12, 0)),
        );
        let id = existing.id;

        let slot = resolve_slot(date(), t(11, 0), t(13, 0)).unwrap();
        let result = check_availability(&slot, &[existing]);

        assert!(!result.available);
        assert_eq!(result.conflict.unwrap().id, id);
    }

    #[test]
    fn test_cancelled_reservation_frees_the_slot() {
        let existing = reservation(
            BookingStatus::Cancelled,
            date().and_time(t(10, 0)),
            date().and_time(t(12, 0)),
        );

        let slot = resolve_slot(date(), t(11, 0), t(13, 0)).unwrap();
        let result = check_availability(&slot, &[existing]);

        assert!(result.available);
        assert!(result.conflict.is_none());
    }

    #[test]
    fn test_blocked_slot_conflicts() {
        let existing = reservation(
            BookingStatus::Blocked,
            date().and_time(t(10, 0)),
            date().and_time(t(12, 0)),
        );

        let slot = resolve_slot(date(), t(10, 0), t(11, 0)).unwrap();
        assert!(!check_availability(&slot, &[existing]).available);
    }

    #[test]
    fn test_midnight_crossing_booking_occupies_both_days() {
        // 23:00-01:00 conflicts with an early slot on the following date
        let existing = reservation(
            BookingStatus::Confirmed,
            date().and_time(t(23, 0)),
            (date() + Days::new(1)).and_time(t(1, 0)),
        );

        let slot = resolve_slot(date() + Days::new(1), t(0, 0), t(2, 0)).unwrap();
        assert!(!check_availability(&slot, &[existing]).available);
    }

    #[test]
    fn test_back_to_back_bookings_allowed() {
        let existing = reservation(
            BookingStatus::Confirmed,
            date().and_time(t(10, 0)),
            date().and_time(t(12, 0)),
        );

        let slot = resolve_slot(date(), t(12, 0), t(14, 0)).unwrap();
        assert!(check_availability(&slot, &[existing]).available);
    }
}
