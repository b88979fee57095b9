//! Patrol shift operations

use chrono::{NaiveDate, NaiveTime};

use super::{EntityStore, pushed, record_mutation, replaced, required};
use crate::data::models::{EntityId, NotificationSeverity, Shift, ShiftStatus};
use crate::error::{AppError, Result};

/// A shift entered by an administrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShift {
    pub user_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl NewShift {
    /// Build from form text: `YYYY-MM-DD` date and `HH:MM` times
    ///
    /// The end time may be earlier than the start time; the shift then runs
    /// past midnight.
    pub fn parse(user_name: &str, date: &str, start_time: &str, end_time: &str) -> Result<Self> {
        let user_name = required("assignee", user_name)?;
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| {
            AppError::Validation(format!("date must be YYYY-MM-DD: {}", e)).recorded()
        })?;

        Ok(Self {
            user_name,
            date,
            start_time: parse_time("start time", start_time)?,
            end_time: parse_time("end time", end_time)?,
        })
    }
}

fn parse_time(field: &str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| AppError::Validation(format!("{} must be HH:MM: {}", field, e)).recorded())
}

impl EntityStore {
    pub fn shift(&self, id: &str) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.id == id)
    }

    /// Schedule a patrol shift (admin only)
    ///
    /// The shift is appended as `scheduled`. Overlapping shifts for the same
    /// person are accepted.
    ///
    /// # Errors
    /// - `Unauthorized` / `Forbidden` unless an admin is logged in
    /// - `Validation` if the assignee name is blank
    pub fn add_shift(&mut self, shift: NewShift) -> Result<Shift> {
        self.require_admin()?;
        let user_name = required("assignee", &shift.user_name)?;

        let shift = Shift {
            id: EntityId::new().0,
            user_id: EntityId::prefixed("manual_").0,
            user_name,
            date: shift.date,
            start_time: shift.start_time,
            end_time: shift.end_time,
            status: ShiftStatus::Scheduled,
        };

        self.shifts = pushed(&self.shifts, shift.clone());
        record_mutation("add_shift");
        tracing::info!(
            shift_id = %shift.id,
            date = %shift.date,
            overnight = shift.crosses_midnight(),
            "Shift added"
        );

        self.notifier.emit(
            "Schedule saved",
            &format!("Patrol shift for {} was added.", shift.user_name),
            NotificationSeverity::Success,
        );

        Ok(shift)
    }

    /// Set a shift's status (admin only); any status may follow any other
    ///
    /// # Errors
    /// - `Unauthorized` / `Forbidden` unless an admin is logged in
    /// - `NotFound` if no shift has this id
    pub fn update_shift_status(&mut self, id: &str, status: ShiftStatus) -> Result<Shift> {
        self.require_admin()?;

        let index = self
            .shifts
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound.recorded())?;

        let updated = Shift {
            status,
            ..self.shifts[index].clone()
        };
        self.shifts = replaced(&self.shifts, index, updated.clone());
        record_mutation("update_shift_status");
        tracing::info!(shift_id = %id, %status, "Shift status updated");

        self.notifier.emit(
            "Schedule updated",
            &format!("Patrol status changed to {}.", status),
            NotificationSeverity::Info,
        );

        Ok(updated)
    }
}
