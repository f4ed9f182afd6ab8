//! Staff Model

use serde::{Deserialize, Serialize};

use crate::calendar::WeeklySchedule;

/// A staff member and their weekly working-hour template
///
/// The template may only be edited between bookings; the engine reads it
/// once per command and never holds it across a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub schedule: WeeklySchedule,
}

impl StaffMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>, schedule: WeeklySchedule) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_active: true,
            schedule,
        }
    }
}
