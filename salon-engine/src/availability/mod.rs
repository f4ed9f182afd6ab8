//! Availability calculator
//!
//! Pure functions: no storage, no clock. The caller supplies the busy
//! intervals and `now`.

mod calculator;

pub use calculator::{Slot, SlotQuery, SlotRejection, Slots, compute_slots};
