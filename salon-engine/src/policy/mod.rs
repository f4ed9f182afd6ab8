//! Policy engine
//!
//! - [`engine`] - booking window and refund decisions
//! - [`provider`] - where the current policy comes from

pub mod engine;
pub mod provider;

pub use engine::{booking_window, evaluate_cancellation, evaluate_no_show, within_booking_window};
pub use provider::{PolicyProvider, SharedPolicy};
