//! Schedule requests and the session layout derived from them.

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use super::calendar::CalendarPolicy;
use crate::config::PlanConfig;
use crate::error::{PlanError, Result};
use crate::workout::Workout;

/// How a week's minutes are split into sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionLayout {
    pub active_days_per_week: u32,
    pub sessions_per_day: u32,
    pub session_minutes: u32,
}

/// A validated request for a training plan.
///
/// `weekly_minutes` is the training volume of one full week. The date range is
/// inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRequest {
    weekly_minutes: u32,
    start: NaiveDate,
    end: NaiveDate,
    high_fraction: f64,
    high_workout: Workout,
    low_workout: Workout,
    calendar: CalendarPolicy,
    config: PlanConfig,
}

impl ScheduleRequest {
    /// Build a request using the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidSchedule`] if the range is inverted, the
    /// minute target is zero or above the configured cap, or the fraction is
    /// outside `[0, 1]`.
    pub fn minutes_with_dates(
        weekly_minutes: u32,
        start: NaiveDate,
        end: NaiveDate,
        high_fraction: f64,
        high_workout: Workout,
        low_workout: Workout,
    ) -> Result<Self> {
        let config = PlanConfig::default();
        let request = Self {
            weekly_minutes,
            start,
            end,
            high_fraction,
            high_workout,
            low_workout,
            calendar: CalendarPolicy::from_config(&config),
            config,
        };
        request.validate()?;
        Ok(request)
    }

    /// Re-validate against `config`, adopting its calendar policy.
    pub fn with_config(mut self, config: &PlanConfig) -> Result<Self> {
        self.calendar = CalendarPolicy::from_config(config);
        self.config = config.clone();
        self.validate()?;
        Ok(self)
    }

    /// Override the rest days.
    pub fn with_rest_days(mut self, rest_days: Vec<Weekday>) -> Result<Self> {
        self.calendar = CalendarPolicy::new(self.calendar.week_start(), rest_days);
        self.config.rest_days = self.calendar.rest_days().to_vec();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        self.config
            .check()
            .map_err(|e| PlanError::InvalidSchedule(e.to_string()))?;
        if self.end < self.start {
            return Err(PlanError::InvalidSchedule(format!(
                "end date {} is before start date {}",
                self.end, self.start
            )));
        }
        if self.weekly_minutes == 0 {
            return Err(PlanError::InvalidSchedule(
                "weekly minutes must be positive".into(),
            ));
        }
        if self.weekly_minutes > self.config.max_weekly_minutes {
            return Err(PlanError::InvalidSchedule(format!(
                "{} weekly minutes exceeds the limit of {}",
                self.weekly_minutes, self.config.max_weekly_minutes
            )));
        }
        if !self.high_fraction.is_finite() || !(0.0..=1.0).contains(&self.high_fraction) {
            return Err(PlanError::InvalidSchedule(format!(
                "high-intensity fraction {} is outside [0, 1]",
                self.high_fraction
            )));
        }
        if self.calendar.active_days_per_week() == 0 {
            return Err(PlanError::InvalidSchedule(
                "every weekday is a rest day".into(),
            ));
        }
        // A partial week drifts by at most its share of the full-week drift
        // plus half a minute of target rounding.
        let drift = self.weekly_drift();
        if drift != 0 && drift >= u64::from(self.config.minute_tolerance) {
            let layout = self.layout();
            return Err(PlanError::InvalidSchedule(format!(
                "{} sessions of {} minutes per week miss the {}-minute target by {drift}, \
                 tolerance is {}",
                layout.sessions_per_day * layout.active_days_per_week,
                layout.session_minutes,
                self.weekly_minutes,
                self.config.minute_tolerance
            )));
        }
        Ok(())
    }

    /// Distance between a full week of rounded sessions and the weekly target.
    fn weekly_drift(&self) -> u64 {
        let layout = self.layout();
        let planned = u64::from(layout.session_minutes)
            * u64::from(layout.sessions_per_day)
            * u64::from(layout.active_days_per_week);
        planned.abs_diff(u64::from(self.weekly_minutes))
    }

    pub fn weekly_minutes(&self) -> u32 {
        self.weekly_minutes
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn high_fraction(&self) -> f64 {
        self.high_fraction
    }

    pub fn high_workout(&self) -> Workout {
        self.high_workout
    }

    pub fn low_workout(&self) -> Workout {
        self.low_workout
    }

    pub fn calendar(&self) -> &CalendarPolicy {
        &self.calendar
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Number of calendar days covered, both ends included.
    pub fn day_count(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.day_count())
    }

    pub fn active_day_count(&self) -> usize {
        self.dates()
            .filter(|d| !self.calendar.is_rest_day(*d))
            .count()
    }

    pub fn layout(&self) -> SessionLayout {
        let active_days_per_week = self.calendar.active_days_per_week().max(1);
        let daily = f64::from(self.weekly_minutes) / f64::from(active_days_per_week);
        let cap = f64::from(self.config.max_session_minutes.max(1));
        let sessions_per_day = ((daily / cap).ceil() as u32).max(1);
        let session_minutes = ((daily / f64::from(sessions_per_day)).round() as u32).max(1);
        SessionLayout {
            active_days_per_week,
            sessions_per_day,
            session_minutes,
        }
    }

    /// Emissions needed to fill every training day of the range.
    pub fn slot_count(&self) -> usize {
        self.active_day_count() * self.layout().sessions_per_day as usize
    }

    /// Minute target for a week with `active_days` training days.
    pub fn week_target(&self, active_days: u32) -> u32 {
        let per_week = f64::from(self.layout().active_days_per_week);
        (f64::from(self.weekly_minutes) * f64::from(active_days) / per_week).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(minutes: u32, start: NaiveDate, end: NaiveDate) -> Result<ScheduleRequest> {
        ScheduleRequest::minutes_with_dates(minutes, start, end, 0.2, Workout::TwoK, Workout::Ut2)
    }

    #[test]
    fn inverted_range_is_invalid() {
        let err = request(600, date(2023, 5, 10), date(2023, 5, 3)).unwrap_err();
        assert!(matches!(err, PlanError::InvalidSchedule(_)));
    }

    #[test]
    fn single_day_range_is_valid() {
        let req = request(600, date(2023, 5, 3), date(2023, 5, 3)).unwrap();
        assert_eq!(req.day_count(), 1);
        assert_eq!(req.dates().collect::<Vec<_>>(), vec![date(2023, 5, 3)]);
    }

    #[test]
    fn zero_or_excessive_minutes_are_invalid() {
        assert!(request(0, date(2023, 5, 3), date(2023, 5, 9)).is_err());
        assert!(request(5000, date(2023, 5, 3), date(2023, 5, 9)).is_err());
    }

    #[test]
    fn fraction_must_be_a_probability() {
        for bad in [-0.1, 1.1, f64::NAN] {
            let err = ScheduleRequest::minutes_with_dates(
                600,
                date(2023, 5, 3),
                date(2023, 5, 9),
                bad,
                Workout::TwoK,
                Workout::Ut2,
            )
            .unwrap_err();
            assert!(matches!(err, PlanError::InvalidSchedule(_)));
        }
    }

    #[test]
    fn all_rest_policy_is_invalid() {
        let req = request(600, date(2023, 5, 3), date(2023, 5, 9)).unwrap();
        let every_day = vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        assert!(req.with_rest_days(every_day).is_err());
    }

    #[test]
    fn long_days_split_into_sessions() {
        let req = request(1200, date(2023, 5, 3), date(2023, 5, 25)).unwrap();
        let layout = req.layout();
        assert_eq!(layout.active_days_per_week, 6);
        assert_eq!(layout.sessions_per_day, 3);
        assert_eq!(layout.session_minutes, 67);
    }

    #[test]
    fn short_days_use_one_session() {
        let req = request(120, date(2023, 5, 3), date(2023, 5, 25)).unwrap();
        let layout = req.layout();
        assert_eq!(layout.sessions_per_day, 1);
        assert_eq!(layout.session_minutes, 20);
    }

    #[test]
    fn slot_count_skips_rest_days() {
        // Wed 3rd to Sun 14th: 12 days, two Sundays.
        let req = request(600, date(2023, 5, 3), date(2023, 5, 14)).unwrap();
        assert_eq!(req.active_day_count(), 10);
        assert_eq!(req.slot_count(), 10 * req.layout().sessions_per_day as usize);
    }

    #[test]
    fn week_target_is_proportional_to_active_days() {
        let req = request(600, date(2023, 5, 3), date(2023, 5, 14)).unwrap();
        assert_eq!(req.week_target(6), 600);
        assert_eq!(req.week_target(3), 300);
        assert_eq!(req.week_target(0), 0);
    }

    #[test]
    fn layout_drift_beyond_tolerance_is_invalid() {
        // 3000 / 6 days = 500 daily, 27 sessions of 19 minutes = 3078 a week.
        let mut config = PlanConfig::default();
        config.max_session_minutes = 19;
        assert!(config.check().is_ok());
        let err = request(3000, date(2023, 5, 8), date(2023, 5, 14))
            .unwrap()
            .with_config(&config)
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidSchedule(_)));

        config.minute_tolerance = 90;
        let req = request(3000, date(2023, 5, 8), date(2023, 5, 14))
            .unwrap()
            .with_config(&config)
            .unwrap();
        assert_eq!(req.layout().sessions_per_day, 27);
        assert_eq!(req.layout().session_minutes, 19);
    }

    #[test]
    fn config_changes_the_calendar() {
        let mut config = PlanConfig::default();
        config.rest_days = vec![Weekday::Sat, Weekday::Sun];
        let req = request(600, date(2023, 5, 3), date(2023, 5, 14))
            .unwrap()
            .with_config(&config)
            .unwrap();
        assert_eq!(req.layout().active_days_per_week, 5);
        assert_eq!(req.active_day_count(), 8);
    }
}
