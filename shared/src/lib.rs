//! Shared types for the salon scheduling engine
//!
//! Pure, serializable value types used by the engine and by its
//! collaborators (catalog, policy admin, notifications, payments).
//! Nothing in this crate performs I/O.

pub mod appointment;
pub mod calendar;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use calendar::{BusyInterval, CalendarError, MinuteRange, WeeklySchedule, WorkingHourRule};
pub use models::{
    CustomerInfo, NotificationPreference, ReminderLeadTime, SalonPolicy, Service, StaffMember,
};
