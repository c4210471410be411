//! The observable output of a hidden state: one scheduled workout.

use serde::{Deserialize, Serialize};

use crate::workout::Workout;

/// One scheduled workout session.
///
/// Emissions carry no identity beyond their fields, so two sessions with the
/// same workout, duration and targets compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Emission {
    pub workout: Workout,
    pub minutes: u32,
    #[serde(rename = "completion")]
    pub completed: bool,
    #[serde(rename = "heartrate")]
    pub heart_rate: u16,
    #[serde(rename = "RPE")]
    pub rpe: u8,
}

impl Emission {
    /// A not-yet-completed session. RPE is clamped to 1-10.
    pub fn planned(workout: Workout, minutes: u32, heart_rate: u16, rpe: u8) -> Self {
        Self {
            workout,
            minutes,
            completed: false,
            heart_rate,
            rpe: rpe.clamp(1, 10),
        }
    }
}
