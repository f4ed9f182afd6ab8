//! Policy evaluation
//!
//! Pure functions over a policy (or the terms frozen on an appointment) and
//! an explicit `now`. Nothing here reads the clock or touches storage.

use rust_decimal::Decimal;
use shared::appointment::{AppointmentSnapshot, AppointmentStatus, CancellationOutcome};
use shared::models::SalonPolicy;

/// Whether `candidate_start` lies inside `[now + min_advance, now + max_advance]`
pub fn within_booking_window(candidate_start: i64, policy: &SalonPolicy, now: i64) -> bool {
    let (earliest, latest) = booking_window(policy, now);
    candidate_start >= earliest && candidate_start <= latest
}

/// Earliest and latest bookable start instants for `now` (both inclusive)
pub fn booking_window(policy: &SalonPolicy, now: i64) -> (i64, i64) {
    (
        now.saturating_add(policy.min_booking_advance_millis()),
        now.saturating_add(policy.max_booking_advance_millis()),
    )
}

/// Refund decision for cancelling `appointment` at `now`
///
/// Reads the cutoff and refundability frozen on the appointment at
/// reservation, never the live policy. Refundable iff the appointment is not
/// a no-show, `now <= start_at - cutoff` (boundary inclusive) and the deposit
/// was refundable when booked. Amounts are zero while the deposit is unpaid.
pub fn evaluate_cancellation(appointment: &AppointmentSnapshot, now: i64) -> CancellationOutcome {
    let cutoff = shared::util::minutes_to_millis(appointment.terms.cancellation_cutoff_minutes);
    let refundable = appointment.status != AppointmentStatus::NoShow
        && now <= appointment.start_at.saturating_sub(cutoff)
        && appointment.terms.deposit_refundable;

    outcome(appointment, refundable, now)
}

/// Refund decision for a no-show: the deposit is always forfeited
pub fn evaluate_no_show(appointment: &AppointmentSnapshot, now: i64) -> CancellationOutcome {
    outcome(appointment, false, now)
}

fn outcome(appointment: &AppointmentSnapshot, refundable: bool, now: i64) -> CancellationOutcome {
    let held = if appointment.deposit_paid {
        appointment.terms.deposit_amount
    } else {
        Decimal::ZERO
    };
    let (refund_amount, forfeited_amount) = if refundable {
        (held, Decimal::ZERO)
    } else {
        (Decimal::ZERO, held)
    };
    CancellationOutcome {
        refundable,
        refund_amount,
        forfeited_amount,
        decided_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::appointment::BookingTerms;

    const HOUR: i64 = 3_600_000;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, min, s)
            .unwrap()
            .timestamp_millis()
    }

    fn policy(min_minutes: i64, max_minutes: i64) -> SalonPolicy {
        SalonPolicy {
            min_booking_advance_minutes: min_minutes,
            max_booking_advance_minutes: max_minutes,
            ..SalonPolicy::default()
        }
    }

    fn appointment(start_at: i64, deposit: Decimal, refundable: bool, paid: bool) -> AppointmentSnapshot {
        let mut apt = AppointmentSnapshot::new("apt-1".to_string());
        apt.start_at = start_at;
        apt.end_at = start_at + HOUR;
        apt.deposit_paid = paid;
        apt.terms = BookingTerms {
            policy_version: 1,
            deposit_amount: deposit,
            deposit_refundable: refundable,
            cancellation_cutoff_minutes: 24 * 60,
        };
        apt
    }

    #[test]
    fn test_min_advance_excludes_too_soon() {
        let policy = policy(120, 60 * 24 * 30);
        let now = at(2026, 3, 16, 9, 0, 0);
        assert!(!within_booking_window(at(2026, 3, 16, 10, 30, 0), &policy, now));
        assert!(within_booking_window(at(2026, 3, 16, 11, 0, 0), &policy, now));
        assert!(within_booking_window(at(2026, 3, 16, 11, 1, 0), &policy, now));
    }

    #[test]
    fn test_max_advance_excludes_too_far() {
        let policy = policy(0, 7 * 24 * 60);
        let now = at(2026, 3, 16, 9, 0, 0);
        assert!(within_booking_window(at(2026, 3, 23, 9, 0, 0), &policy, now));
        assert!(!within_booking_window(at(2026, 3, 23, 9, 0, 1), &policy, now));
    }

    #[test]
    fn test_cancellation_cutoff_boundary_is_inclusive() {
        let start = at(2026, 3, 18, 9, 0, 0);
        let apt = appointment(start, Decimal::new(2000, 2), true, true);

        let on_cutoff = evaluate_cancellation(&apt, at(2026, 3, 17, 9, 0, 0));
        assert!(on_cutoff.refundable);
        assert_eq!(on_cutoff.refund_amount, Decimal::new(2000, 2));
        assert_eq!(on_cutoff.forfeited_amount, Decimal::ZERO);

        let one_second_late = evaluate_cancellation(&apt, at(2026, 3, 17, 9, 0, 1));
        assert!(!one_second_late.refundable);
        assert_eq!(one_second_late.refund_amount, Decimal::ZERO);
        assert_eq!(one_second_late.forfeited_amount, Decimal::new(2000, 2));
    }

    #[test]
    fn test_non_refundable_deposit_never_refunds() {
        let start = at(2026, 3, 18, 9, 0, 0);
        let apt = appointment(start, Decimal::new(1500, 2), false, true);
        let outcome = evaluate_cancellation(&apt, at(2026, 3, 10, 9, 0, 0));
        assert!(!outcome.refundable);
        assert_eq!(outcome.forfeited_amount, Decimal::new(1500, 2));
    }

    #[test]
    fn test_unpaid_deposit_moves_no_money() {
        let start = at(2026, 3, 18, 9, 0, 0);
        let apt = appointment(start, Decimal::new(1500, 2), true, false);
        let outcome = evaluate_cancellation(&apt, at(2026, 3, 18, 8, 0, 0));
        assert!(!outcome.refundable);
        assert_eq!(outcome.refund_amount, Decimal::ZERO);
        assert_eq!(outcome.forfeited_amount, Decimal::ZERO);
    }

    #[test]
    fn test_no_show_always_forfeits() {
        let start = at(2026, 3, 18, 9, 0, 0);
        let mut apt = appointment(start, Decimal::new(1000, 2), true, true);
        let outcome = evaluate_no_show(&apt, start + HOUR);
        assert!(!outcome.refundable);
        assert_eq!(outcome.forfeited_amount, Decimal::new(1000, 2));

        apt.status = AppointmentStatus::NoShow;
        assert!(!evaluate_cancellation(&apt, at(2026, 3, 1, 0, 0, 0)).refundable);
    }
}
