//! Patrol schedule calendar
//!
//! Week navigation and per-day grouping of shifts. Weeks run Monday
//! to Sunday.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::data::Shift;

/// The Monday on or before `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date - Days::new(offset)
}

/// Shifts keyed by date, each day's shifts in collection order
pub fn group_by_date(shifts: &[Shift]) -> BTreeMap<NaiveDate, Vec<&Shift>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<&Shift>> = BTreeMap::new();
    for shift in shifts {
        grouped.entry(shift.date).or_default().push(shift);
    }
    grouped
}

/// A calendar week, identified by its Monday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekView {
    start: NaiveDate,
}

/// One day in the agenda list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaDay<'a> {
    pub date: NaiveDate,
    pub is_today: bool,
    pub shifts: Vec<&'a Shift>,
}

impl WeekView {
    /// The week containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            start: start_of_week(date),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Days::new(6)
    }

    pub fn days(&self) -> [NaiveDate; 7] {
        std::array::from_fn(|i| self.start + Days::new(i as u64))
    }

    pub fn previous(&self) -> Self {
        Self {
            start: self.start - Days::new(7),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            start: self.start + Days::new(7),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end()
    }

    /// Header text such as "6 Oct - 12 Oct"
    pub fn range_label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%-d %b"),
            self.end().format("%-d %b")
        )
    }

    /// Days of this week that have shifts, plus today if it falls inside
    pub fn agenda<'a>(&self, shifts: &'a [Shift], today: NaiveDate) -> Vec<AgendaDay<'a>> {
        let mut grouped = group_by_date(shifts);
        self.days()
            .into_iter()
            .filter_map(|date| {
                let shifts = grouped.remove(&date).unwrap_or_default();
                let is_today = date == today;
                (is_today || !shifts.is_empty()).then_some(AgendaDay {
                    date,
                    is_today,
                    shifts,
                })
            })
            .collect()
    }
}
