//! Calendar-shaped plan output: weeks of days of workouts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::emission::Emission;
use crate::workout::Intensity;

/// One calendar day of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub date: Option<NaiveDate>,
    pub expected_workouts: u32,
    pub rest: bool,
    pub emissions: Vec<Emission>,
}

impl Day {
    pub fn rest(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            expected_workouts: 0,
            rest: true,
            emissions: Vec::new(),
        }
    }

    pub fn workout(date: NaiveDate, expected_workouts: u32, emissions: Vec<Emission>) -> Self {
        Self {
            date: Some(date),
            expected_workouts,
            rest: false,
            emissions,
        }
    }

    /// Whether this day is held to its expected workout count.
    pub fn verify_day(&self) -> bool {
        !self.rest
    }

    pub fn total_minutes(&self) -> u32 {
        self.emissions.iter().map(|e| e.minutes).sum()
    }
}

/// A training week. Only the first and last week of a plan may be partial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    pub index: usize,
    pub target_minutes: u32,
    pub days: Vec<Day>,
}

impl Week {
    pub fn total_minutes(&self) -> u32 {
        self.days.iter().map(Day::total_minutes).sum()
    }

    pub fn is_full(&self) -> bool {
        self.days.len() == 7
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.first().and_then(|d| d.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.last().and_then(|d| d.date)
    }

    pub fn within(&self, target: u32, tolerance: u32) -> bool {
        self.total_minutes().abs_diff(target) <= tolerance
    }
}

/// The formatted plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub weeks: Vec<Week>,
}

impl Schedule {
    pub fn new(weeks: Vec<Week>) -> Self {
        Self { weeks }
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn days(&self) -> impl Iterator<Item = &Day> {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }

    pub fn emissions(&self) -> impl Iterator<Item = &Emission> {
        self.days().flat_map(|d| d.emissions.iter())
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.weeks.first().and_then(Week::first_date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.weeks.last().and_then(Week::last_date)
    }

    pub fn total_minutes(&self) -> u32 {
        self.weeks.iter().map(Week::total_minutes).sum()
    }

    /// Share of sessions whose workout is high intensity, 0 for an empty plan.
    pub fn high_intensity_share(&self) -> f64 {
        let (high, total) = self.emissions().fold((0usize, 0usize), |(h, t), e| {
            let is_high = e.workout.intensity() == Intensity::High;
            (h + usize::from(is_high), t + 1)
        });
        if total == 0 {
            0.0
        } else {
            high as f64 / total as f64
        }
    }

    /// Check the plan shape against a weekly minute target.
    ///
    /// Every workout day must hold its expected count, and every full week must
    /// land within `tolerance` minutes of `weekly_minutes`.
    pub fn conforms_to(&self, weekly_minutes: u32, tolerance: u32) -> bool {
        self.weeks.iter().all(|week| {
            let counts_ok = week
                .days
                .iter()
                .all(|d| !d.verify_day() || d.emissions.len() == d.expected_workouts as usize);
            counts_ok && (!week.is_full() || week.within(weekly_minutes, tolerance))
        })
    }
}
