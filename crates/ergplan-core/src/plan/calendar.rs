//! Week boundaries and rest-day policy.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::PlanConfig;

/// Which weekday opens a training week and which weekdays are rest days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarPolicy {
    week_start: Weekday,
    rest_days: Vec<Weekday>,
}

impl Default for CalendarPolicy {
    fn default() -> Self {
        Self::new(Weekday::Mon, vec![Weekday::Sun])
    }
}

impl CalendarPolicy {
    /// Duplicate rest days are collapsed.
    pub fn new(week_start: Weekday, rest_days: Vec<Weekday>) -> Self {
        let mut unique: Vec<Weekday> = Vec::with_capacity(rest_days.len());
        for day in rest_days {
            if !unique.contains(&day) {
                unique.push(day);
            }
        }
        Self {
            week_start,
            rest_days: unique,
        }
    }

    pub fn from_config(config: &PlanConfig) -> Self {
        Self::new(config.week_start, config.rest_days.clone())
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn rest_days(&self) -> &[Weekday] {
        &self.rest_days
    }

    pub fn is_rest_day(&self, date: NaiveDate) -> bool {
        self.rest_days.contains(&date.weekday())
    }

    pub fn starts_week(&self, date: NaiveDate) -> bool {
        date.weekday() == self.week_start
    }

    /// Training days in a full week.
    pub fn active_days_per_week(&self) -> u32 {
        7 - self.rest_days.len() as u32
    }
}
