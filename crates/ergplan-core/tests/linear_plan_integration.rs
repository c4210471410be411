//! Integration tests for linear plan generation.
//!
//! These tests run the full pipeline (request, builder, model walk,
//! formatter) and check the calendar invariants of the resulting schedule.

use chrono::{NaiveDate, Weekday};
use ergplan_core::{
    generate_linear_plan, with_shared_source, EmissionFormatter, LinearModelBuilder,
    ModelBuilder, PlanConfig, PlanError, Schedule, ScheduleFormatter, ScheduleRequest, SeededSource, Workout,
};
use proptest::prelude::*;

const TOLERANCE: u32 = 60;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn request(minutes: u32, start: NaiveDate, end: NaiveDate, h: f64) -> ScheduleRequest {
    ScheduleRequest::minutes_with_dates(minutes, start, end, h, Workout::TwoK, Workout::Ut2).unwrap()
}

fn generate(req: &ScheduleRequest, seed: u64) -> Schedule {
    let mut source = SeededSource::from_seed(seed);
    generate_linear_plan(req, &mut source).unwrap()
}

#[test]
fn test_linear_max_validates() {
    let req = request(1200, date(2023, 5, 3), date(2023, 5, 25), 0.2);
    for seed in 0..20 {
        let schedule = generate(&req, seed);
        assert!(schedule.conforms_to(1200, TOLERANCE));
    }
}

#[test]
fn test_linear_min_validates() {
    let req = request(120, date(2023, 5, 3), date(2023, 5, 25), 0.2);
    for seed in 0..20 {
        assert!(generate(&req, seed).conforms_to(120, TOLERANCE));
    }
}

#[test]
fn test_linear_short_plan() {
    let req = request(600, date(2023, 5, 3), date(2023, 5, 4), 0.2);
    let schedule = generate(&req, 1);
    assert!(schedule.conforms_to(600, TOLERANCE));
    assert_eq!(schedule.days().count(), 2);
    assert_eq!(schedule.first_date(), Some(date(2023, 5, 3)));
    assert_eq!(schedule.last_date(), Some(date(2023, 5, 4)));
}

#[test]
fn test_linear_ends_on_rest_day() {
    // Saturday the 13th is a rest day under a weekend-off policy.
    let req = request(600, date(2023, 5, 3), date(2023, 5, 13), 0.2)
        .with_rest_days(vec![Weekday::Sat, Weekday::Sun])
        .unwrap();
    let schedule = generate(&req, 2);
    assert!(schedule.conforms_to(120, TOLERANCE));

    let last_week = schedule.weeks().last().unwrap();
    let last_day = last_week.days.last().unwrap();
    assert!(last_day.rest);
    assert!(last_day.emissions.is_empty());
    assert_eq!(last_day.date, Some(date(2023, 5, 13)));
}

#[test]
fn test_linear_ends_on_default_week() {
    let req = request(600, date(2023, 5, 3), date(2023, 5, 13), 0.2);
    let schedule = generate(&req, 3);
    assert!(schedule.conforms_to(120, TOLERANCE));
    assert_eq!(schedule.last_date(), Some(date(2023, 5, 13)));
}

#[test]
fn test_linear_ends_higher_intensity() {
    let req = request(600, date(2023, 5, 3), date(2023, 5, 13), 0.5);
    for seed in 0..20 {
        assert!(generate(&req, seed).conforms_to(120, TOLERANCE));
    }
}

#[test]
fn test_state_counts_match_volume() {
    let builder = LinearModelBuilder::new();
    let max = ScheduleRequest::minutes_with_dates(
        1200,
        date(2023, 5, 3),
        date(2023, 5, 25),
        0.2,
        Workout::of("2k").unwrap(),
        Workout::of("UT2").unwrap(),
    )
    .unwrap();
    assert_eq!(builder.build(&max).unwrap().state_count(), 10);

    let min = ScheduleRequest::minutes_with_dates(
        120,
        date(2023, 5, 3),
        date(2023, 5, 25),
        0.2,
        Workout::of("30r20").unwrap(),
        Workout::of("UT2").unwrap(),
    )
    .unwrap();
    assert_eq!(builder.build(&min).unwrap().state_count(), 2);
}

#[test]
fn test_unknown_workout_is_rejected() {
    assert!(matches!(Workout::of("3k"), Err(PlanError::NoWorkoutType(_))));
}

#[test]
fn test_high_share_tracks_requested_fraction() {
    let req = request(900, date(2021, 1, 4), date(2022, 12, 31), 0.3);
    let schedule = generate(&req, 17);
    let share = schedule.high_intensity_share();
    assert!((share - 0.3).abs() < 0.05, "high share was {share}");
}

#[test]
fn test_same_seed_same_plan() {
    let req = request(700, date(2023, 1, 2), date(2023, 3, 26), 0.4);
    assert_eq!(generate(&req, 99), generate(&req, 99));
}

#[test]
fn test_manual_pipeline_matches_helper() {
    let req = request(700, date(2023, 1, 2), date(2023, 3, 26), 0.4);
    let model = LinearModelBuilder::new().build(&req).unwrap();
    let mut source = SeededSource::from_seed(5);
    let raw = model.generate_random_sequence(req.slot_count(), &mut source).unwrap();
    assert_eq!(raw.len(), req.slot_count());
    let schedule = ScheduleFormatter::new(&req).format_emissions(raw).unwrap();
    assert_eq!(schedule, generate(&req, 5));
}

#[test]
fn test_shared_source_generates_valid_plans() {
    let req = request(480, date(2023, 5, 1), date(2023, 6, 30), 0.25);
    let schedule = with_shared_source(|source| generate_linear_plan(&req, source)).unwrap();
    assert!(schedule.conforms_to(480, TOLERANCE));
}

#[test]
fn test_inverted_range_is_rejected() {
    let err = ScheduleRequest::minutes_with_dates(
        600,
        date(2023, 5, 13),
        date(2023, 5, 3),
        0.2,
        Workout::TwoK,
        Workout::Ut2,
    )
    .unwrap_err();
    assert!(matches!(err, PlanError::InvalidSchedule(_)));
}

#[test]
fn test_short_sessions_cannot_break_weekly_tolerance() {
    let mut config = PlanConfig::default();
    config.max_session_minutes = 19;
    let err = request(3000, date(2023, 5, 8), date(2023, 5, 14), 0.2)
        .with_config(&config)
        .unwrap_err();
    assert!(matches!(err, PlanError::InvalidSchedule(_)));

    config.minute_tolerance = 90;
    let req = request(3000, date(2023, 5, 8), date(2023, 5, 14), 0.2)
        .with_config(&config)
        .unwrap();
    let schedule = generate(&req, 5);
    assert!(schedule.conforms_to(3000, 90));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn fuzz_accepted_layouts_always_format(
        minutes in 1u32..=3000,
        max_session in 10u32..=120,
        tolerance in 0u32..=90,
        days in 1i64..=21,
        seed in any::<u64>(),
    ) {
        let mut config = PlanConfig::default();
        config.max_session_minutes = max_session;
        config.minute_tolerance = tolerance;
        let start = date(2023, 5, 3);
        let end = start + chrono::Duration::days(days - 1);
        let accepted = request(minutes, start, end, 0.3).with_config(&config);
        if let Ok(req) = accepted {
            let schedule = generate(&req, seed);
            prop_assert!(schedule.conforms_to(minutes, tolerance));
        }
    }

    #[test]
    fn fuzz_linear_generator_keeps_boundaries(
        minutes in 120u32..=1200,
        start_year in 2015i32..=2023,
        start_month in 1u32..=12,
        start_day in 1u32..=28,
        year_offset in 1i32..=3,
        end_month in 1u32..=12,
        end_day in 1u32..=28,
        high in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let start = date(start_year, start_month, start_day);
        let end = date(start_year + year_offset, end_month, end_day);
        let req = request(minutes, start, end, high);
        let schedule = generate(&req, seed);

        prop_assert_eq!(schedule.first_date(), Some(start));
        prop_assert_eq!(schedule.last_date(), Some(end));
        prop_assert!(schedule.conforms_to(minutes, TOLERANCE));
        prop_assert_eq!(schedule.days().count(), req.day_count());
    }

    #[test]
    fn fuzz_walk_follows_transition_graph(
        minutes in 120u32..=3000,
        days in 1i64..=120,
        high in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let start = date(2023, 1, 1);
        let end = start + chrono::Duration::days(days - 1);
        let req = request(minutes, start, end, high);
        let model = LinearModelBuilder::new().build(&req).unwrap();
        let mut source = SeededSource::from_seed(seed);
        let path = model.walk(req.slot_count(), &mut source).unwrap();
        prop_assert_eq!(path.len(), req.slot_count());
        for pair in path.windows(2) {
            let from = model.state(&pair[0].0).unwrap();
            let p = from.transitions().probability(&pair[1].0).unwrap_or(0.0);
            prop_assert!(p > 0.0);
        }
    }
}
