//! Builds a Markov model from a schedule request.
//!
//! The linear builder arranges states in progression tiers. Each tier has one
//! high-intensity and one low-intensity state; the chain drifts forward
//! through the tiers at a rate that reaches the last tier by the end of the
//! plan, and picks high over low with the requested fraction at every step.

use tracing::debug;

use super::request::ScheduleRequest;
use crate::distribution::Distribution;
use crate::emission::Emission;
use crate::error::Result;
use crate::markov::{HiddenState, MarkovModel, StateKey};
use crate::workout::{Intensity, Workout};

/// Heart-rate offsets (bpm) and weights of the emission variants per state.
const HEART_RATE_VARIANTS: [(i32, f64); 3] = [(-3, 0.25), (0, 0.5), (3, 0.25)];

/// Heart-rate rise per tier.
const BPM_PER_TIER: u16 = 2;

/// Turns a request into a validated model.
pub trait ModelBuilder {
    fn build(&self, request: &ScheduleRequest) -> Result<MarkovModel>;
}

/// Linear-progression builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearModelBuilder;

impl LinearModelBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Number of progression tiers for `request`.
    ///
    /// One tier per `minutes_per_tier` weekly minutes, clamped to
    /// `[1, max_tiers]`, and never more tiers than days in the plan.
    pub fn tier_count(request: &ScheduleRequest) -> u8 {
        let config = request.config();
        let by_volume = (request.weekly_minutes() / config.minutes_per_tier.max(1))
            .clamp(1, u32::from(config.max_tiers.max(1)));
        let by_days = u32::try_from(request.day_count()).unwrap_or(u32::MAX);
        by_volume.min(by_days).min(u32::from(u8::MAX)) as u8
    }

    /// Per-step probability of moving up one tier.
    pub fn advance_probability(tiers: u8, slots: usize) -> f64 {
        if tiers <= 1 || slots <= 1 {
            return 0.0;
        }
        (f64::from(tiers - 1) / (slots - 1) as f64).min(1.0)
    }

    fn keys(tiers: u8) -> Vec<StateKey> {
        (0..tiers)
            .flat_map(|t| [StateKey::high(t), StateKey::low(t)])
            .collect()
    }

    fn intensity_weight(intensity: Intensity, high_fraction: f64) -> f64 {
        match intensity {
            Intensity::High => high_fraction,
            Intensity::Low => 1.0 - high_fraction,
        }
    }

    fn transition_row(
        from_tier: u8,
        tiers: u8,
        advance: f64,
        high_fraction: f64,
        keys: &[StateKey],
    ) -> Distribution<StateKey> {
        let is_last = from_tier + 1 == tiers;
        keys.iter()
            .map(|key| {
                let step = if key.tier == from_tier {
                    if is_last {
                        1.0
                    } else {
                        1.0 - advance
                    }
                } else if !is_last && key.tier == from_tier + 1 {
                    advance
                } else {
                    0.0
                };
                (*key, step * Self::intensity_weight(key.intensity, high_fraction))
            })
            .collect()
    }

    fn emission_row(
        key: StateKey,
        tiers: u8,
        session_minutes: u32,
        request: &ScheduleRequest,
    ) -> Distribution<Emission> {
        let workout = match key.intensity {
            Intensity::High => request.high_workout(),
            Intensity::Low => request.low_workout(),
        };
        let tiers_left = tiers - 1 - key.tier;
        let heart_rate = workout
            .base_heart_rate()
            .saturating_sub(BPM_PER_TIER * u16::from(tiers_left));
        let rpe = workout.base_rpe().saturating_sub(tiers_left / 2);
        HEART_RATE_VARIANTS
            .iter()
            .map(|(offset, weight)| {
                let bpm = (i32::from(heart_rate) + offset).clamp(40, 220) as u16;
                (
                    Emission::planned(workout, session_minutes, bpm, rpe),
                    *weight,
                )
            })
            .collect()
    }

    fn start_row(high_fraction: f64, keys: &[StateKey]) -> Distribution<StateKey> {
        keys.iter()
            .map(|key| {
                let p = if key.tier == 0 {
                    Self::intensity_weight(key.intensity, high_fraction)
                } else {
                    0.0
                };
                (*key, p)
            })
            .collect()
    }
}

impl ModelBuilder for LinearModelBuilder {
    fn build(&self, request: &ScheduleRequest) -> Result<MarkovModel> {
        let tiers = Self::tier_count(request);
        let layout = request.layout();
        let advance = Self::advance_probability(tiers, request.slot_count());
        let h = request.high_fraction();
        let keys = Self::keys(tiers);

        debug!(
            tiers,
            advance,
            session_minutes = layout.session_minutes,
            sessions_per_day = layout.sessions_per_day,
            "building linear model"
        );

        let states: Vec<HiddenState> = keys
            .iter()
            .map(|key| {
                HiddenState::new(
                    *key,
                    Self::transition_row(key.tier, tiers, advance, h, &keys),
                    Self::emission_row(*key, tiers, layout.session_minutes, request),
                )
            })
            .collect();

        MarkovModel::new(Self::start_row(h, &keys), states)
    }
}

/// Resolve two workout identifiers before any model work starts.
pub fn resolve_workouts(high: &str, low: &str) -> Result<(Workout, Workout)> {
    Ok((Workout::of(high)?, Workout::of(low)?))
}
