//! Hidden states of the workout chain.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distribution::Distribution;
use crate::emission::Emission;
use crate::error::{PlanError, Result};
use crate::random::RandomSource;
use crate::workout::Intensity;

/// Discriminator of a hidden state: its intensity role and progression tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey {
    pub intensity: Intensity,
    pub tier: u8,
}

impl StateKey {
    pub fn high(tier: u8) -> Self {
        Self {
            intensity: Intensity::High,
            tier,
        }
    }

    pub fn low(tier: u8) -> Self {
        Self {
            intensity: Intensity::Low,
            tier,
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self.intensity {
            Intensity::High => "high",
            Intensity::Low => "low",
        };
        write!(f, "{role}-t{}", self.tier)
    }
}

/// A hidden state with its transition and emission distributions.
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenState {
    key: StateKey,
    transitions: Distribution<StateKey>,
    emissions: Distribution<Emission>,
}

impl HiddenState {
    pub fn new(
        key: StateKey,
        transitions: Distribution<StateKey>,
        emissions: Distribution<Emission>,
    ) -> Self {
        Self {
            key,
            transitions,
            emissions,
        }
    }

    pub fn key(&self) -> StateKey {
        self.key
    }

    pub fn transitions(&self) -> &Distribution<StateKey> {
        &self.transitions
    }

    pub fn emissions(&self) -> &Distribution<Emission> {
        &self.emissions
    }

    /// States this one can name as a successor, zero-weight ones included.
    pub fn potential_states(&self) -> HashSet<StateKey> {
        self.transitions.keys().copied().collect()
    }

    pub fn check_distributions(&self) -> Result<()> {
        self.transitions
            .validate()
            .map_err(|e| self.annotate("transition", e))?;
        self.emissions
            .validate()
            .map_err(|e| self.annotate("emission", e))
    }

    /// Sample the next state.
    pub fn transition(&self, source: &mut dyn RandomSource) -> Result<StateKey> {
        self.transitions.sample(source).copied()
    }

    /// Sample one emission.
    pub fn emit(&self, source: &mut dyn RandomSource) -> Result<Emission> {
        self.emissions.sample(source).cloned()
    }

    fn annotate(&self, which: &str, err: PlanError) -> PlanError {
        match err {
            PlanError::InvalidDistribution(msg) => PlanError::InvalidDistribution(format!(
                "{which} distribution of state {}: {msg}",
                self.key
            )),
            other => other,
        }
    }
}
