//! The Markov model: a closed set of hidden states plus a start distribution.
//!
//! The model only supports forward generation. Closure (every state's
//! transition row names exactly the model's states) is verified once in
//! [`MarkovModel::new`], so a walk can never step into an unknown state.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use super::formatter::EmissionFormatter;
use super::state::{HiddenState, StateKey};
use crate::distribution::Distribution;
use crate::emission::Emission;
use crate::error::{PlanError, Result};
use crate::random::RandomSource;

/// An immutable, validated hidden Markov model.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovModel {
    states: IndexMap<StateKey, HiddenState>,
    start: Distribution<StateKey>,
}

impl MarkovModel {
    /// Build and validate a model.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidDistribution`] if the start distribution is
    /// empty or invalid, if a state key repeats, if the start keys differ from
    /// the state keys, or if any state fails
    /// [`check_state_distributions`](Self::check_state_distributions).
    pub fn new(
        start: Distribution<StateKey>,
        states: impl IntoIterator<Item = HiddenState>,
    ) -> Result<Self> {
        if start.is_empty() {
            return Err(PlanError::InvalidDistribution(
                "start distribution was missing when building a Markov model".into(),
            ));
        }

        let mut by_key = IndexMap::new();
        for state in states {
            let key = state.key();
            if by_key.insert(key, state).is_some() {
                return Err(PlanError::InvalidDistribution(format!(
                    "state {key} was supplied more than once"
                )));
            }
        }

        start.validate_over(by_key.keys()).map_err(|e| match e {
            PlanError::InvalidDistribution(msg) => {
                PlanError::InvalidDistribution(format!("start distribution: {msg}"))
            }
            other => other,
        })?;

        let model = Self {
            states: by_key,
            start,
        };
        model.check_state_distributions()?;
        debug!(states = model.state_count(), "markov model validated");
        Ok(model)
    }

    /// Verify closure and per-state distributions.
    pub fn check_state_distributions(&self) -> Result<()> {
        let all: HashSet<StateKey> = self.states.keys().copied().collect();
        for state in self.states.values() {
            if state.potential_states() != all {
                return Err(PlanError::InvalidDistribution(format!(
                    "hidden state {} has a transition distribution that contains foreign \
                     states or omits states of the model",
                    state.key()
                )));
            }
            state.check_distributions()?;
        }
        Ok(())
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn states(&self) -> impl Iterator<Item = &HiddenState> {
        self.states.values()
    }

    pub fn state(&self, key: &StateKey) -> Option<&HiddenState> {
        self.states.get(key)
    }

    pub fn start_distribution(&self) -> &Distribution<StateKey> {
        &self.start
    }

    /// Walk the chain for `len` steps, recording the state behind each emission.
    ///
    /// Each step emits from the current state and then transitions.
    pub fn walk(
        &self,
        len: usize,
        source: &mut dyn RandomSource,
    ) -> Result<Vec<(StateKey, Emission)>> {
        let mut current = *self.start.sample(source)?;
        let mut path = Vec::with_capacity(len);
        for _ in 0..len {
            let state = self.lookup(&current)?;
            path.push((current, state.emit(source)?));
            current = state.transition(source)?;
        }
        Ok(path)
    }

    /// Generate `len` emissions.
    pub fn generate_random_sequence(
        &self,
        len: usize,
        source: &mut dyn RandomSource,
    ) -> Result<Vec<Emission>> {
        Ok(self
            .walk(len, source)?
            .into_iter()
            .map(|(_, emission)| emission)
            .collect())
    }

    /// Generate `len` emissions and hand them to `formatter`.
    pub fn generate_formatted_emissions<F: EmissionFormatter>(
        &self,
        len: usize,
        formatter: &F,
        source: &mut dyn RandomSource,
    ) -> Result<F::Output> {
        formatter.format_emissions(self.generate_random_sequence(len, source)?)
    }

    fn lookup(&self, key: &StateKey) -> Result<&HiddenState> {
        // Unreachable after validation, but a bad key must not panic.
        self.states.get(key).ok_or_else(|| {
            PlanError::InvalidDistribution(format!("state {key} is not part of the model"))
        })
    }
}
