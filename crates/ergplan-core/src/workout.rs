//! Catalog of rowing workout archetypes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Broad physiological class of a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    High,
    Low,
}

/// A workout archetype known to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Workout {
    /// 2000m race-pace piece
    #[serde(rename = "2k")]
    TwoK,
    /// 6000m test piece
    #[serde(rename = "6k")]
    SixK,
    /// 30 minutes at stroke rate 20
    #[serde(rename = "30r20")]
    ThirtyR20,
    /// Anaerobic threshold intervals
    #[serde(rename = "AT")]
    AnaerobicThreshold,
    /// Utilisation 1, upper aerobic
    #[serde(rename = "UT1")]
    Ut1,
    /// Utilisation 2, easy aerobic base
    #[serde(rename = "UT2")]
    Ut2,
    /// Steady-state technical paddle
    #[serde(rename = "SS")]
    SteadyState,
}

impl Workout {
    pub const ALL: [Workout; 7] = [
        Workout::TwoK,
        Workout::SixK,
        Workout::ThirtyR20,
        Workout::AnaerobicThreshold,
        Workout::Ut1,
        Workout::Ut2,
        Workout::SteadyState,
    ];

    /// Look up a workout by identifier, ignoring case.
    pub fn of(name: &str) -> Result<Workout, PlanError> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|w| w.id().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| PlanError::NoWorkoutType(name.to_string()))
    }

    /// Canonical identifier, matching the serialized form.
    pub fn id(self) -> &'static str {
        match self {
            Workout::TwoK => "2k",
            Workout::SixK => "6k",
            Workout::ThirtyR20 => "30r20",
            Workout::AnaerobicThreshold => "AT",
            Workout::Ut1 => "UT1",
            Workout::Ut2 => "UT2",
            Workout::SteadyState => "SS",
        }
    }

    pub fn intensity(self) -> Intensity {
        match self {
            Workout::TwoK | Workout::SixK | Workout::ThirtyR20 | Workout::AnaerobicThreshold => {
                Intensity::High
            }
            Workout::Ut1 | Workout::Ut2 | Workout::SteadyState => Intensity::Low,
        }
    }

    /// Typical working heart rate in bpm.
    pub fn base_heart_rate(self) -> u16 {
        match self {
            Workout::TwoK => 186,
            Workout::SixK => 178,
            Workout::ThirtyR20 => 168,
            Workout::AnaerobicThreshold => 172,
            Workout::Ut1 => 155,
            Workout::Ut2 => 142,
            Workout::SteadyState => 135,
        }
    }

    /// Typical rate of perceived exertion on a 1-10 scale.
    pub fn base_rpe(self) -> u8 {
        match self {
            Workout::TwoK => 10,
            Workout::SixK => 9,
            Workout::ThirtyR20 => 7,
            Workout::AnaerobicThreshold => 8,
            Workout::Ut1 => 5,
            Workout::Ut2 => 4,
            Workout::SteadyState => 3,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Workout::TwoK => "2000m race-pace piece",
            Workout::SixK => "6000m test piece",
            Workout::ThirtyR20 => "30 minutes continuous at rate 20",
            Workout::AnaerobicThreshold => "anaerobic threshold intervals",
            Workout::Ut1 => "upper aerobic steady state",
            Workout::Ut2 => "easy aerobic base",
            Workout::SteadyState => "technical steady-state paddle",
        }
    }
}

impl FromStr for Workout {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Workout::of(s)
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
