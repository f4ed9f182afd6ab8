//! Reminder scheduling for the notification collaborator
//!
//! The engine only answers "when is the next reminder due"; delivery and
//! templating happen elsewhere.

use shared::appointment::{AppointmentSnapshot, AppointmentStatus};
use shared::models::NotificationPreference;
use shared::util::minutes_to_millis;

/// Instant (Unix millis) at which a reminder for `appointment` is due
///
/// `None` when the customer opted out of reminders, the appointment is no
/// longer upcoming, or the lead time reaches back to before the booking was
/// made.
pub fn next_reminder_due_at(
    appointment: &AppointmentSnapshot,
    preference: &NotificationPreference,
) -> Option<i64> {
    if !preference.email_reminders {
        return None;
    }
    if !matches!(
        appointment.status,
        AppointmentStatus::Pending | AppointmentStatus::Confirmed
    ) {
        return None;
    }

    let lead = minutes_to_millis(preference.reminder_lead_time.minutes());
    let due = appointment.start_at.saturating_sub(lead);
    (due > appointment.created_at).then_some(due)
}
