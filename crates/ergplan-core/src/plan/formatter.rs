//! Lays a raw emission sequence onto the request's calendar.

use chrono::NaiveDate;
use tracing::warn;

use super::request::ScheduleRequest;
use super::schedule::{Day, Schedule, Week};
use crate::emission::Emission;
use crate::error::{PlanError, Result};
use crate::markov::EmissionFormatter;

/// Formats emissions into a [`Schedule`] covering the request's date range.
///
/// Rest days stay empty; every other day takes `sessions_per_day` emissions
/// in sequence order. The sequence must match the slot count exactly.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleFormatter<'a> {
    request: &'a ScheduleRequest,
}

impl<'a> ScheduleFormatter<'a> {
    pub fn new(request: &'a ScheduleRequest) -> Self {
        Self { request }
    }

    fn close_week(&self, index: usize, days: Vec<Day>) -> Week {
        let active = days.iter().filter(|d| !d.rest).count() as u32;
        Week {
            index,
            target_minutes: self.request.week_target(active),
            days,
        }
    }

    fn verify(&self, schedule: &Schedule) -> Result<()> {
        let expect_date = |found: Option<NaiveDate>, wanted: NaiveDate, which: &str| {
            if found == Some(wanted) {
                Ok(())
            } else {
                Err(failure(format!(
                    "{which} day is {found:?}, expected {wanted}"
                )))
            }
        };
        expect_date(schedule.first_date(), self.request.start(), "first")?;
        expect_date(schedule.last_date(), self.request.end(), "last")?;

        let tolerance = self.request.config().minute_tolerance;
        for week in schedule.weeks() {
            if let Some(day) = week
                .days
                .iter()
                .find(|d| d.verify_day() && d.emissions.len() != d.expected_workouts as usize)
            {
                return Err(failure(format!(
                    "day {:?} holds {} workouts, expected {}",
                    day.date,
                    day.emissions.len(),
                    day.expected_workouts
                )));
            }
            if !week.within(week.target_minutes, tolerance) {
                return Err(failure(format!(
                    "week {} totals {} minutes, target {} ± {tolerance}",
                    week.index,
                    week.total_minutes(),
                    week.target_minutes
                )));
            }
        }
        Ok(())
    }
}

fn failure(message: String) -> PlanError {
    warn!(%message, "schedule formatting failed");
    PlanError::FormatterFailure(message)
}

impl EmissionFormatter for ScheduleFormatter<'_> {
    type Output = Schedule;

    fn format_emissions(&self, emissions: Vec<Emission>) -> Result<Schedule> {
        let needed = self.request.slot_count();
        if emissions.len() < needed {
            return Err(failure(format!(
                "sequence of {} emissions is shorter than the {needed} calendar slots",
                emissions.len()
            )));
        }
        if emissions.len() > needed {
            return Err(failure(format!(
                "sequence of {} emissions leaves {} unassigned after {needed} calendar slots",
                emissions.len(),
                emissions.len() - needed
            )));
        }

        let per_day = self.request.layout().sessions_per_day;
        let calendar = self.request.calendar();
        let mut remaining = emissions.into_iter();
        let mut weeks = Vec::new();
        let mut days = Vec::new();

        for date in self.request.dates() {
            if !days.is_empty() && calendar.starts_week(date) {
                let week = self.close_week(weeks.len(), std::mem::take(&mut days));
                weeks.push(week);
            }
            if calendar.is_rest_day(date) {
                days.push(Day::rest(date));
            } else {
                let assigned: Vec<Emission> = remaining.by_ref().take(per_day as usize).collect();
                days.push(Day::workout(date, per_day, assigned));
            }
        }
        if !days.is_empty() {
            let week = self.close_week(weeks.len(), days);
            weeks.push(week);
        }

        let schedule = Schedule::new(weeks);
        self.verify(&schedule)?;
        Ok(schedule)
    }
}
