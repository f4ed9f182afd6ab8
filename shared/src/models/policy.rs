//! Salon Policy Model (salon-wide booking rules)

use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::util::minutes_to_millis;

/// Salon-wide booking policy
///
/// Supplied by the policy-admin collaborator. `version` increases on every
/// administrative change; appointments record the version they were booked
/// under together with a frozen copy of the fields that concern them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalonPolicy {
    pub version: u64,
    /// Deposit taken at booking; zero means no deposit is required
    pub deposit_amount: Decimal,
    /// Whether deposits taken under this policy can be refunded on timely cancellation
    pub deposit_refundable: bool,
    /// Earliest bookable start, relative to now
    pub min_booking_advance_minutes: i64,
    /// Latest bookable start, relative to now
    pub max_booking_advance_minutes: i64,
    /// Cancelling later than this before start forfeits the deposit
    pub cancellation_cutoff_minutes: i64,
    /// Business timezone used to place working hours on the timeline
    pub timezone: Tz,
}

impl SalonPolicy {
    pub fn deposit_required(&self) -> bool {
        self.deposit_amount > Decimal::ZERO
    }

    pub fn min_booking_advance_millis(&self) -> i64 {
        minutes_to_millis(self.min_booking_advance_minutes)
    }

    pub fn max_booking_advance_millis(&self) -> i64 {
        minutes_to_millis(self.max_booking_advance_minutes)
    }

    pub fn cancellation_cutoff_millis(&self) -> i64 {
        minutes_to_millis(self.cancellation_cutoff_minutes)
    }
}

impl Default for SalonPolicy {
    fn default() -> Self {
        Self {
            version: 1,
            deposit_amount: Decimal::ZERO,
            deposit_refundable: true,
            min_booking_advance_minutes: 0,
            max_booking_advance_minutes: 60 * 24 * 60,
            cancellation_cutoff_minutes: 24 * 60,
            timezone: Tz::UTC,
        }
    }
}
