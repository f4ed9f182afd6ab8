//! Calendar model - time ranges, weekly working-hour templates, busy intervals
//!
//! All ranges are half-open: `[start, end)`. Two ranges overlap iff
//! `a.start < b.end && b.start < a.end`, so back-to-back appointments
//! (one ending at 11:00, the next starting at 11:00) never conflict.
//!
//! Clock times within a day are minute-of-day integers (`0..=1440`).
//! Weekdays are numbered `0..=6` starting on Sunday.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of minutes in a calendar day
pub const MINUTES_PER_DAY: u32 = 1440;

/// Calendar validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("Weekday out of range: {0} (expected 0-6)")]
    InvalidWeekday(u8),

    #[error("Minute of day out of range: {0}")]
    InvalidMinute(u32),

    #[error("Empty or inverted time range: {start}-{end}")]
    EmptyRange { start: u32, end: u32 },

    #[error("Duplicate working-hour rule for weekday {0}")]
    DuplicateWeekday(u8),

    #[error("Invalid clock time: {0}")]
    InvalidClockTime(String),
}

/// Half-open overlap test shared by every range type in the engine
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

/// Weekday index of a date, Sunday = 0
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Format a minute-of-day as `HH:MM`
pub fn format_minute(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Parse `HH:MM` into a minute-of-day (`24:00` is accepted as end of day)
pub fn parse_minute(value: &str) -> Result<u32, CalendarError> {
    if value == "24:00" {
        return Ok(MINUTES_PER_DAY);
    }
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|t| t.hour() * 60 + t.minute())
        .map_err(|_| CalendarError::InvalidClockTime(value.to_string()))
}

// ============================================================================
// MinuteRange
// ============================================================================

/// A non-empty half-open range of minutes within one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MinuteRange {
    pub start: u32,
    pub end: u32,
}

impl MinuteRange {
    pub fn new(start: u32, end: u32) -> Result<Self, CalendarError> {
        if end > MINUTES_PER_DAY {
            return Err(CalendarError::InvalidMinute(end));
        }
        if start >= end {
            return Err(CalendarError::EmptyRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range starting at `start` and lasting `duration` minutes
    pub fn starting_at(start: u32, duration: u32) -> Result<Self, CalendarError> {
        Self::new(start, start.saturating_add(duration))
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn overlaps(&self, other: &MinuteRange) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    /// Whether `other` lies entirely inside this range
    pub fn covers(&self, other: &MinuteRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl std::fmt::Display for MinuteRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", format_minute(self.start), format_minute(self.end))
    }
}

// ============================================================================
// Working hours
// ============================================================================

/// One weekday of a staff member's working-hour template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHourRule {
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: u8,
    pub is_active: bool,
    pub start_minute: u32,
    pub end_minute: u32,
}

impl WorkingHourRule {
    pub fn new(weekday: u8, start_minute: u32, end_minute: u32) -> Self {
        Self {
            weekday,
            is_active: true,
            start_minute,
            end_minute,
        }
    }

    /// A day off: kept in the template so every weekday has a rule
    pub fn day_off(weekday: u8) -> Self {
        Self {
            weekday,
            is_active: false,
            start_minute: 0,
            end_minute: MINUTES_PER_DAY,
        }
    }

    pub fn validate(&self) -> Result<(), CalendarError> {
        if self.weekday > 6 {
            return Err(CalendarError::InvalidWeekday(self.weekday));
        }
        MinuteRange::new(self.start_minute, self.end_minute).map(|_| ())
    }

    /// Working hours as a range; `None` when the rule is inactive or malformed
    pub fn hours(&self) -> Option<MinuteRange> {
        if !self.is_active {
            return None;
        }
        MinuteRange::new(self.start_minute, self.end_minute).ok()
    }
}

/// Weekly working-hour template, at most one rule per weekday, ordered by weekday
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    rules: Vec<WorkingHourRule>,
}

impl WeeklySchedule {
    pub fn new(mut rules: Vec<WorkingHourRule>) -> Result<Self, CalendarError> {
        for rule in &rules {
            rule.validate()?;
        }
        rules.sort_by_key(|r| r.weekday);
        if let Some(pair) = rules.windows(2).find(|w| w[0].weekday == w[1].weekday) {
            return Err(CalendarError::DuplicateWeekday(pair[0].weekday));
        }
        Ok(Self { rules })
    }

    /// Same hours on every listed weekday
    pub fn uniform(weekdays: &[u8], start_minute: u32, end_minute: u32) -> Result<Self, CalendarError> {
        Self::new(
            weekdays
                .iter()
                .map(|&d| WorkingHourRule::new(d, start_minute, end_minute))
                .collect(),
        )
    }

    pub fn rules(&self) -> &[WorkingHourRule] {
        &self.rules
    }

    /// Working hours for a weekday, if the staff member works that day
    pub fn hours_on_weekday(&self, weekday: u8) -> Option<MinuteRange> {
        self.rules
            .iter()
            .find(|r| r.weekday == weekday)
            .and_then(WorkingHourRule::hours)
    }

    /// Working hours for a calendar date
    pub fn hours_on(&self, date: NaiveDate) -> Option<MinuteRange> {
        self.hours_on_weekday(weekday_index(date))
    }
}

// ============================================================================
// Busy intervals
// ============================================================================

/// Time occupied by one non-cancelled appointment, `[start_at, end_at)` in Unix millis
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusyInterval {
    pub appointment_id: String,
    pub start_at: i64,
    pub end_at: i64,
}

impl BusyInterval {
    pub fn new(appointment_id: impl Into<String>, start_at: i64, end_at: i64) -> Self {
        Self {
            appointment_id: appointment_id.into(),
            start_at,
            end_at,
        }
    }

    pub fn overlaps(&self, start_at: i64, end_at: i64) -> bool {
        overlaps(self.start_at, self.end_at, start_at, end_at)
    }
}
