//! Notification Preference Model
//!
//! Consumed by the engine to decide whether and when a reminder is due.
//! Delivery and templating belong to the notification collaborator.

use serde::{Deserialize, Serialize};

/// How long before the appointment a reminder goes out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderLeadTime {
    OneHour,
    TwoHours,
    #[default]
    OneDay,
    TwoDays,
}

impl ReminderLeadTime {
    pub fn minutes(self) -> i64 {
        match self {
            ReminderLeadTime::OneHour => 60,
            ReminderLeadTime::TwoHours => 120,
            ReminderLeadTime::OneDay => 24 * 60,
            ReminderLeadTime::TwoDays => 48 * 60,
        }
    }
}

/// Per-customer notification flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreference {
    pub email_reminders: bool,
    #[serde(default)]
    pub reminder_lead_time: ReminderLeadTime,
    #[serde(default)]
    pub promotional_opt_in: bool,
    #[serde(default = "default_true")]
    pub appointment_updates: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationPreference {
    fn default() -> Self {
        Self {
            email_reminders: true,
            reminder_lead_time: ReminderLeadTime::default(),
            promotional_opt_in: false,
            appointment_updates: true,
        }
    }
}
